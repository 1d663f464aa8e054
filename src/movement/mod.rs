pub mod linear;

pub use linear::*;

use crate::collision_system::Collidable;
use crate::error::SimError;
use crate::geo::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Something a movement controller can reposition and rotate.
pub trait Moveable {
    fn position(&self) -> P2;
    fn set_position(&mut self, position: P2);
    fn rotation(&self) -> Float;
    fn set_rotation(&mut self, rotation: Float);
}

macro_rules! moveable_shape {
    ($t:ty) => {
        impl Moveable for $t {
            fn position(&self) -> P2 {
                self.get_origin()
            }

            fn set_position(&mut self, position: P2) {
                self.set_origin(position);
            }

            fn rotation(&self) -> Float {
                self.get_rotation()
            }

            fn set_rotation(&mut self, rotation: Float) {
                Rotate::set_rotation(self, rotation);
            }
        }
    };
}

moveable_shape!(Circle);
moveable_shape!(Rect);
moveable_shape!(Geo);

impl Moveable for Collidable {
    fn position(&self) -> P2 {
        self.bounds().get_origin()
    }

    fn set_position(&mut self, position: P2) {
        self.update_bounds(|bounds| bounds.set_origin(position));
    }

    fn rotation(&self) -> Float {
        self.bounds().get_rotation()
    }

    fn set_rotation(&mut self, rotation: Float) {
        self.update_bounds(|bounds| Rotate::set_rotation(bounds, rotation));
    }
}

/// A shared collidable moves through its interior bounds lock, so the game
/// that monitors it sees the new position on its next scan.
impl Moveable for Arc<Collidable> {
    fn position(&self) -> P2 {
        self.bounds().get_origin()
    }

    fn set_position(&mut self, position: P2) {
        self.update_bounds(|bounds| bounds.set_origin(position));
    }

    fn rotation(&self) -> Float {
        self.bounds().get_rotation()
    }

    fn set_rotation(&mut self, rotation: Float) {
        self.update_bounds(|bounds| Rotate::set_rotation(bounds, rotation));
    }
}

/// Screen directions, y grows downward.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = SimError;

    /// case sensitive
    fn from_str(token: &str) -> Result<Direction, SimError> {
        match token {
            "Left" => Ok(Direction::Left),
            "Right" => Ok(Direction::Right),
            "Up" => Ok(Direction::Up),
            "Down" => Ok(Direction::Down),
            _ => Err(SimError::UnknownDirection(token.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        f.write_str(name)
    }
}

/// Emitted whenever a controller starts or stops moving in a direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveEvent {
    pub direction: Direction,
    pub start_moving: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens() {
        for d in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            assert_eq!(d.to_string().parse::<Direction>().unwrap(), d);
        }
        match "left".parse::<Direction>() {
            Err(SimError::UnknownDirection(token)) => assert_eq!(token, "left"),
            other => panic!("unexpected {:?}", other),
        }
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn shapes_and_collidables_move() {
        let mut circle = Circle::new(P2::new(1.0, 1.0), 2.0);
        circle.set_position(P2::new(3.0, 4.0));
        Moveable::set_rotation(&mut circle, 1.0);
        assert_eq!(circle.origin, P2::new(3.0, 4.0));
        assert_eq!(Moveable::rotation(&circle), 1.0);

        let mut shared = Arc::new(Collidable::new(Rect::new(P2::origin(), 0.0, 2.0, 2.0)));
        let observer = shared.clone();
        shared.set_position(P2::new(5.0, 0.0));
        Moveable::set_rotation(&mut shared, 0.5);
        assert_eq!(observer.bounds().get_origin(), P2::new(5.0, 0.0));
        assert_eq!(observer.bounds().get_rotation(), 0.5);
    }
}
