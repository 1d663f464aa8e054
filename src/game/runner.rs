//! Multiplexes every live game onto one shared [`Looper`].

use super::looper::{Looper, LooperWaker, TimedCallback};
use super::GameId;
use crate::error::{Result, SimError};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// The two entry points the shared timer drives for a registered game.
pub trait TickTarget: Send + Sync {
    fn prepare_update(&self);
    fn prepare_push(&self);
}

/// Retunes one callback slot of a registered game. Changes apply at the
/// timer's next scheduling decision.
#[derive(Clone)]
pub struct RateSetter {
    callback: Arc<TimedCallback>,
    waker: LooperWaker,
}

impl RateSetter {
    pub fn get(&self) -> u32 {
        self.callback.rate()
    }

    pub fn set(&self, rate: u32) {
        self.callback.set_rate(rate);
        self.waker.wake();
    }
}

impl fmt::Debug for RateSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateSetter")
            .field("callback", &self.callback.name())
            .field("rate", &self.get())
            .finish()
    }
}

/// Returned by [`GameRunner::register`].
#[derive(Clone, Debug)]
pub struct GameRegistration {
    pub update_rate: RateSetter,
    pub push_rate: RateSetter,
}

struct GameLoopCallbacks {
    update: Arc<TimedCallback>,
    push: Arc<TimedCallback>,
}

struct RunnerState {
    games: HashMap<GameId, GameLoopCallbacks>,
    looper: Option<Looper>,
    live: usize,
    timers_started: u64,
}

/// Shared scheduler handle. Clones refer to the same registry and timer.
///
/// The timer thread exists exactly while at least one game is registered.
#[derive(Clone)]
pub struct GameRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl GameRunner {
    pub fn new() -> GameRunner {
        GameRunner {
            state: Arc::new(Mutex::new(RunnerState {
                games: HashMap::new(),
                looper: None,
                live: 0,
                timers_started: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds both slots of `target` to the shared timer, starting the timer
    /// for the first live game. Slots start paused at rate 0.
    pub fn register(&self, id: GameId, target: Arc<dyn TickTarget>) -> Result<GameRegistration> {
        let mut state = self.lock();
        if state.games.contains_key(&id) {
            return Err(SimError::GameAlreadyRegistered(id));
        }

        let looper = match state.looper.take() {
            Some(looper) => looper,
            None => {
                let looper = Looper::start()?;
                state.timers_started += 1;
                info!(game = %id, "shared timer started");
                looper
            }
        };

        let update_target = target.clone();
        let update = TimedCallback::new(format!("game-{}-update", id), 0, move || {
            update_target.prepare_update()
        });
        let push = TimedCallback::new(format!("game-{}-push", id), 0, move || {
            target.prepare_push()
        });
        looper.add_callback(update.clone());
        looper.add_callback(push.clone());

        let waker = looper.waker();
        state.looper = Some(looper);
        state.live += 1;
        state.games.insert(
            id,
            GameLoopCallbacks {
                update: update.clone(),
                push: push.clone(),
            },
        );
        debug!(game = %id, live = state.live, "game registered");

        Ok(GameRegistration {
            update_rate: RateSetter {
                callback: update,
                waker: waker.clone(),
            },
            push_rate: RateSetter {
                callback: push,
                waker,
            },
        })
    }

    /// Removes both slots of the game. Unregistering the last live game stops
    /// the shared timer.
    pub fn unregister(&self, id: GameId) -> Result<()> {
        let mut state = self.lock();
        let callbacks = state
            .games
            .remove(&id)
            .ok_or(SimError::GameNotRegistered(id))?;
        if let Some(looper) = state.looper.as_ref() {
            looper.remove_callback(&callbacks.update);
            looper.remove_callback(&callbacks.push);
        }
        state.live -= 1;
        debug!(game = %id, live = state.live, "game unregistered");

        let retired = if state.live == 0 {
            state.looper.take()
        } else {
            None
        };
        drop(state);

        // joining happens outside the lock so an in flight tick can still
        // reach the runner
        if let Some(mut looper) = retired {
            looper.stop();
            info!("shared timer stopped");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.lock().looper.is_some()
    }

    pub fn live_games(&self) -> usize {
        self.lock().live
    }

    /// number of times a shared timer was started over the runner's lifetime
    pub fn timers_started(&self) -> u64 {
        self.lock().timers_started
    }

    /// (update, push) rates of a registered game
    pub fn rates(&self, id: GameId) -> Option<(u32, u32)> {
        self.lock()
            .games
            .get(&id)
            .map(|callbacks| (callbacks.update.rate(), callbacks.push.rate()))
    }

    /// (update, push) invocation counts of a registered game
    pub fn invocations(&self, id: GameId) -> Option<(u64, u64)> {
        self.lock().games.get(&id).map(|callbacks| {
            (
                callbacks.update.invocations(),
                callbacks.push.invocations(),
            )
        })
    }
}

impl Default for GameRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("GameRunner")
            .field("live", &state.live)
            .field("running", &state.looper.is_some())
            .finish()
    }
}
