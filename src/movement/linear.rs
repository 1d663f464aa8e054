use super::*;
use crate::error::Result;
use crate::game::GameTime;
use std::fmt;

/// Which directions a controller is currently asked to move in.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct LinearDirections {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl LinearDirections {
    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    fn set(&mut self, direction: Direction, moving: bool) {
        match direction {
            Direction::Left => self.left = moving,
            Direction::Right => self.right = moving,
            Direction::Up => self.up = moving,
            Direction::Down => self.down = moving,
        }
    }
}

/// Moves its moveables at a constant speed, in units per second, in the
/// directions it was told to move in.
///
/// In single axis mode vertical movement wins over horizontal movement.
pub struct LinearMovementController {
    position: P2,
    rotation: Float,
    velocity: V2,
    move_speed: Float,
    moving: LinearDirections,
    rotate_with_movement: bool,
    multi_directional: bool,
    frozen: bool,
    moveables: Vec<Box<dyn Moveable + Send>>,
    on_move: Listeners<MoveEvent>,
}

impl LinearMovementController {
    /// multi directional, rotating with movement
    pub fn new(moveables: Vec<Box<dyn Moveable + Send>>, move_speed: Float) -> Self {
        Self::with_options(moveables, move_speed, true, true)
    }

    /// Starts at the position of the first moveable, or the origin if there
    /// is none.
    pub fn with_options(
        moveables: Vec<Box<dyn Moveable + Send>>,
        move_speed: Float,
        rotate_with_movement: bool,
        multi_directional: bool,
    ) -> Self {
        let position = moveables
            .first()
            .map(|m| m.position())
            .unwrap_or_else(P2::origin);
        LinearMovementController {
            position,
            rotation: 0.0,
            velocity: V2::zeros(),
            move_speed,
            moving: LinearDirections::default(),
            rotate_with_movement,
            multi_directional,
            frozen: false,
            moveables,
            on_move: Listeners::new(),
        }
    }

    pub fn velocity(&self) -> V2 {
        self.velocity
    }

    pub fn move_speed(&self) -> Float {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, move_speed: Float) {
        self.move_speed = move_speed;
        self.update_velocity();
    }

    pub fn moving(&self) -> LinearDirections {
        self.moving
    }

    pub fn on_move(&self) -> &Listeners<MoveEvent> {
        &self.on_move
    }

    /// stops position integration and synchronisation
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_moving(&self) -> bool {
        !self.frozen && self.velocity != V2::zeros()
    }

    pub fn is_moving_in(&self, direction: Direction) -> bool {
        self.moving.get(direction)
    }

    pub fn start_moving(&mut self, direction: Direction) {
        self.move_in(direction, true);
    }

    pub fn stop_moving(&mut self, direction: Direction) {
        self.move_in(direction, false);
    }

    pub fn move_in(&mut self, direction: Direction, start_moving: bool) {
        self.moving.set(direction, start_moving);
        self.update_velocity();
        self.update_rotation();
        self.on_move.notify(&MoveEvent {
            direction,
            start_moving,
        });
    }

    /// like [`Self::move_in`] for a direction token received from a client
    pub fn move_token(&mut self, token: &str, start_moving: bool) -> Result<()> {
        let direction = token.parse()?;
        self.move_in(direction, start_moving);
        Ok(())
    }

    pub fn update(&mut self, game_time: &GameTime) {
        if self.frozen {
            return;
        }
        self.position += self.velocity * game_time.elapsed().as_secs_f64();
        for moveable in self.moveables.iter_mut() {
            moveable.set_position(self.position);
            moveable.set_rotation(self.rotation);
        }
    }

    fn update_velocity(&mut self) {
        let speed = self.move_speed;
        let mut velocity = V2::zeros();
        if self.moving.up {
            velocity.y -= speed;
        }
        if self.moving.down {
            velocity.y += speed;
        }
        if self.multi_directional || velocity.y == 0.0 {
            if self.moving.left {
                velocity.x -= speed;
            }
            if self.moving.right {
                velocity.x += speed;
            }
        }
        self.velocity = velocity;
    }

    fn update_rotation(&mut self) {
        if self.rotate_with_movement && self.velocity != V2::zeros() {
            self.rotation = self.velocity.y.atan2(self.velocity.x);
        }
    }
}

impl Moveable for LinearMovementController {
    fn position(&self) -> P2 {
        self.position
    }

    fn set_position(&mut self, position: P2) {
        self.position = position;
    }

    fn rotation(&self) -> Float {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Float) {
        self.rotation = rotation;
    }
}

impl fmt::Debug for LinearMovementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearMovementController")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("velocity", &self.velocity)
            .field("moving", &self.moving)
            .field("frozen", &self.frozen)
            .field("moveables", &self.moveables.len())
            .finish()
    }
}
