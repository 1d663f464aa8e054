//! Single threaded periodic timer that many rated callbacks share.

use crate::error::Result;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info};

type Action = Box<dyn FnMut() + Send>;

/// An action invoked `rate` times per second by a [`Looper`]. A rate of 0
/// pauses the callback.
pub struct TimedCallback {
    name: String,
    rate: AtomicU32,
    last_fired: Mutex<Option<Instant>>,
    invocations: AtomicU64,
    action: Mutex<Action>,
}

impl TimedCallback {
    pub fn new<F>(name: impl Into<String>, rate: u32, action: F) -> Arc<TimedCallback>
    where
        F: FnMut() + Send + 'static,
    {
        Arc::new(TimedCallback {
            name: name.into(),
            rate: AtomicU32::new(rate),
            last_fired: Mutex::new(None),
            invocations: AtomicU64::new(0),
            action: Mutex::new(Box::new(action)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rate(&self) -> u32 {
        self.rate.load(Ordering::Acquire)
    }

    /// Takes effect at the looper's next scheduling decision. Use a
    /// [`LooperWaker`] to make that decision happen right away.
    pub fn set_rate(&self, rate: u32) {
        self.rate.store(rate, Ordering::Release);
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// None while paused. A callback that never fired is due immediately.
    fn next_due(&self, now: Instant) -> Option<Instant> {
        let rate = self.rate();
        if rate == 0 {
            return None;
        }
        let interval = Duration::from_secs(1) / rate;
        match *lock(&self.last_fired) {
            Some(last) => Some(last + interval),
            None => Some(now),
        }
    }

    fn fire(&self, now: Instant) {
        *lock(&self.last_fired) = Some(now);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        let mut action = lock(&self.action);
        if panic::catch_unwind(AssertUnwindSafe(|| (*action)())).is_err() {
            error!(callback = %self.name, "timed callback panicked");
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct LooperState {
    callbacks: Vec<Arc<TimedCallback>>,
    running: bool,
}

struct LooperShared {
    state: Mutex<LooperState>,
    wake: Condvar,
}

impl LooperShared {
    fn notify(&self) {
        // taking the lock orders the wake up after any pending state change
        let _state = lock(&self.state);
        self.wake.notify_all();
    }
}

/// Makes a looper reconsider its schedule, e.g. after a rate change.
#[derive(Clone)]
pub struct LooperWaker {
    shared: Weak<LooperShared>,
}

impl LooperWaker {
    pub fn wake(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.notify();
        }
    }
}

/// Owns the timer thread. Callbacks run one at a time on that thread, each to
/// completion before the next due callback is picked.
pub struct Looper {
    shared: Arc<LooperShared>,
    thread: Option<JoinHandle<()>>,
}

impl Looper {
    /// spawns the timer thread
    pub fn start() -> Result<Looper> {
        let shared = Arc::new(LooperShared {
            state: Mutex::new(LooperState {
                callbacks: Vec::new(),
                running: true,
            }),
            wake: Condvar::new(),
        });
        let thread_shared = shared.clone();
        let thread = thread::Builder::new()
            .name("looper".into())
            .spawn(move || run(thread_shared))?;
        info!("looper started");
        Ok(Looper {
            shared,
            thread: Some(thread),
        })
    }

    pub fn add_callback(&self, callback: Arc<TimedCallback>) {
        lock(&self.shared.state).callbacks.push(callback);
        self.shared.wake.notify_all();
    }

    /// returns false if no callback with the same identity was registered
    pub fn remove_callback(&self, callback: &Arc<TimedCallback>) -> bool {
        let mut state = lock(&self.shared.state);
        let len_before = state.callbacks.len();
        state.callbacks.retain(|c| !Arc::ptr_eq(c, callback));
        let removed = state.callbacks.len() != len_before;
        drop(state);
        self.shared.wake.notify_all();
        removed
    }

    pub fn callback_count(&self) -> usize {
        lock(&self.shared.state).callbacks.len()
    }

    pub fn waker(&self) -> LooperWaker {
        LooperWaker {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Signals the thread and joins it, unless called from the timer thread
    /// itself in which case the thread exits after the current callback.
    pub fn stop(&mut self) {
        let thread = match self.thread.take() {
            Some(thread) => thread,
            None => return,
        };
        {
            let mut state = lock(&self.shared.state);
            state.running = false;
            state.callbacks.clear();
        }
        self.shared.wake.notify_all();
        if thread.thread().id() != thread::current().id() && thread.join().is_err() {
            error!("looper thread panicked");
        }
        info!("looper stopped");
    }
}

impl Drop for Looper {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(shared: Arc<LooperShared>) {
    let mut state = lock(&shared.state);
    loop {
        if !state.running {
            break;
        }
        let now = Instant::now();
        let mut next: Option<(Instant, Arc<TimedCallback>)> = None;
        for callback in state.callbacks.iter() {
            if let Some(due) = callback.next_due(now) {
                if next.as_ref().map_or(true, |(best, _)| due < *best) {
                    next = Some((due, callback.clone()));
                }
            }
        }
        state = match next {
            Some((due, callback)) if due <= now => {
                drop(state);
                callback.fire(now);
                lock(&shared.state)
            }
            Some((due, _)) => {
                shared
                    .wake
                    .wait_timeout(state, due - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => shared
                .wake
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner),
        };
    }
}
