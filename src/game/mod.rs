pub mod configuration;
pub mod looper;
pub mod runner;
pub mod time;

pub use configuration::*;
pub use runner::{GameRegistration, GameRunner, RateSetter, TickTarget};
pub use time::*;

use crate::collision_system::*;
use crate::error::{Result, SimError};
use crate::utils::Listeners;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct GameId(u64);

impl GameId {
    pub(crate) fn next() -> GameId {
        GameId(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User logic driven by a [`Game`]. Both hooks run on the shared timer thread.
pub trait GameLogic: Send + 'static {
    /// Runs after the clock refresh and the collision scan of the same tick.
    fn update(&mut self, _game_time: &GameTime, _collisions: &CollisionManager) {}

    fn push(&mut self) {}
}

impl GameLogic for () {}

struct GameState<L> {
    time: GameTime,
    collisions: CollisionManager,
    logic: L,
}

struct GameShared<L> {
    state: Mutex<GameState<L>>,
}

impl<L> GameShared<L> {
    fn lock(&self) -> MutexGuard<'_, GameState<L>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: GameLogic> TickTarget for GameShared<L> {
    fn prepare_update(&self) {
        let mut state = self.lock();
        let GameState {
            time,
            collisions,
            logic,
        } = &mut *state;
        time.update();
        collisions.update(time);
        logic.update(time, collisions);
    }

    fn prepare_push(&self) {
        self.lock().logic.push();
    }
}

/// One simulation instance: a clock, a collision manager and user logic,
/// ticked by a shared [`GameRunner`] from construction until disposal.
pub struct Game<L: GameLogic> {
    id: GameId,
    configuration: GameConfiguration,
    monitor: MonitorHandle,
    shared: Arc<GameShared<L>>,
    runner: GameRunner,
    disposed: AtomicBool,
}

impl<L: GameLogic> Game<L> {
    pub fn new(runner: &GameRunner, logic: L) -> Result<Game<L>> {
        Game::with_settings(runner, logic, GameSettings::default())
    }

    pub fn with_settings(runner: &GameRunner, logic: L, settings: GameSettings) -> Result<Game<L>> {
        let id = GameId::next();
        let collisions = CollisionManager::new();
        let monitor = collisions.handle();
        let shared = Arc::new(GameShared {
            state: Mutex::new(GameState {
                time: GameTime::new(),
                collisions,
                logic,
            }),
        });
        let registration = runner.register(id, shared.clone())?;
        Ok(Game {
            id,
            configuration: GameConfiguration::new(registration, settings),
            monitor,
            shared,
            runner: runner.clone(),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn configuration(&self) -> &GameConfiguration {
        &self.configuration
    }

    /// picked up by the collision scan of the next update
    pub fn monitor(&self, collidable: &Arc<Collidable>) {
        self.monitor.monitor(collidable);
    }

    pub fn unmonitor(&self, collidable: &Collidable) {
        self.monitor.unmonitor(collidable);
    }

    /// thread safe handle to this game's collision manager queues
    pub fn collision_monitor(&self) -> MonitorHandle {
        self.monitor.clone()
    }

    pub fn on_collision(&self) -> &Listeners<CollisionPair> {
        self.monitor.on_collision()
    }

    /// clock as of the last update
    pub fn time(&self) -> GameTime {
        self.shared.lock().time.clone()
    }

    /// Runs `f` with the logic locked against the timer thread. Disposing
    /// the game from inside `f` deadlocks.
    pub fn with_logic<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
        f(&mut self.shared.lock().logic)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Unregisters from the runner, which stops both cadences.
    pub fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Err(SimError::GameAlreadyDisposed(self.id));
        }
        self.runner.unregister(self.id)
    }
}

impl<L: GameLogic> Drop for Game<L> {
    fn drop(&mut self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            if let Err(e) = self.runner.unregister(self.id) {
                debug!(game = %self.id, error = %e, "unregister on drop failed");
            }
        }
    }
}

impl<L: GameLogic> fmt::Debug for Game<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("configuration", &self.configuration)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::*;
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    #[derive(Default)]
    struct Recorder {
        updates: u64,
        pushes: u64,
        pairs_seen: Vec<u64>,
        pairs: Arc<AtomicU64>,
    }

    impl GameLogic for Recorder {
        fn update(&mut self, _game_time: &GameTime, _collisions: &CollisionManager) {
            self.updates += 1;
            self.pairs_seen.push(self.pairs.load(Ordering::SeqCst));
        }

        fn push(&mut self) {
            self.pushes += 1;
        }
    }

    fn paused() -> GameSettings {
        GameSettings {
            update_rate: 0,
            push_rate: 0,
        }
    }

    #[test]
    fn construction_registers_and_dispose_unregisters() {
        let runner = GameRunner::new();
        let game = Game::new(&runner, ()).unwrap();
        assert!(runner.is_running());
        assert_eq!(runner.live_games(), 1);
        assert_eq!(runner.rates(game.id()), Some((40, 25)));

        game.dispose().unwrap();
        assert!(game.is_disposed());
        assert!(!runner.is_running());
        assert!(matches!(
            game.dispose(),
            Err(SimError::GameAlreadyDisposed(id)) if id == game.id()
        ));
    }

    #[test]
    fn dropping_a_game_unregisters_it() {
        let runner = GameRunner::new();
        let first = Game::new(&runner, ()).unwrap();
        {
            let _second = Game::new(&runner, ()).unwrap();
            assert_eq!(runner.live_games(), 2);
        }
        assert_eq!(runner.live_games(), 1);
        drop(first);
        assert!(!runner.is_running());
        assert_eq!(runner.timers_started(), 1);
    }

    #[test]
    fn update_observes_collisions_of_the_same_tick() {
        let runner = GameRunner::new();
        let game = Game::with_settings(&runner, Recorder::default(), paused()).unwrap();
        let pairs = game.with_logic(|logic| logic.pairs.clone());
        let counter = pairs.clone();
        game.on_collision().subscribe(move |_: &CollisionPair| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let a = Arc::new(Collidable::new(Circle::new(P2::new(0.0, 0.0), 1.0)));
        let b = Arc::new(Collidable::new(Circle::new(P2::new(1.0, 0.0), 1.0)));
        game.monitor(&a);
        game.monitor(&b);
        game.configuration().set_update_rate(100);

        assert!(wait_for(|| game.with_logic(|logic| logic.updates) >= 3));
        game.configuration().set_update_rate(0);
        let seen = game.with_logic(|logic| logic.pairs_seen.clone());
        assert_eq!(&seen[..3], &[1, 2, 3]);
        game.dispose().unwrap();
    }

    #[test]
    fn push_cadence_is_independent() {
        let runner = GameRunner::new();
        let game = Game::with_settings(
            &runner,
            Recorder::default(),
            GameSettings {
                update_rate: 200,
                push_rate: 0,
            },
        )
        .unwrap();
        assert!(wait_for(|| game.with_logic(|logic| logic.updates) >= 10));
        assert_eq!(game.with_logic(|logic| logic.pushes), 0);

        game.configuration().set_push_rate(200);
        assert!(wait_for(|| game.with_logic(|logic| logic.pushes) >= 5));
        assert_eq!(game.configuration().settings().push_rate, 200);
    }

    #[test]
    fn games_keep_their_own_rates() {
        let runner = GameRunner::new();
        let a = Game::new(&runner, ()).unwrap();
        let b = Game::with_settings(&runner, (), paused()).unwrap();
        a.configuration().set_update_rate(60);
        assert_eq!(runner.rates(a.id()), Some((60, 25)));
        assert_eq!(runner.rates(b.id()), Some((0, 0)));
        assert_eq!(b.configuration().update_rate(), 0);
    }

    #[test]
    fn clock_advances_with_updates() {
        let runner = GameRunner::new();
        let game = Game::with_settings(
            &runner,
            (),
            GameSettings {
                update_rate: 200,
                push_rate: 0,
            },
        )
        .unwrap();
        assert!(wait_for(|| game.time().total() >= Duration::from_millis(20)));
    }
}
