use std::time::{Duration, SystemTime};
use tracing::warn;

/// Wall clock snapshot refreshed once per update.
#[derive(Clone, Debug)]
pub struct GameTime {
    start: SystemTime,
    now: SystemTime,
    elapsed: Duration,
    total: Duration,
}

impl GameTime {
    pub fn new() -> GameTime {
        GameTime::starting_at(SystemTime::now())
    }

    pub fn starting_at(start: SystemTime) -> GameTime {
        GameTime {
            start,
            now: start,
            elapsed: Duration::ZERO,
            total: Duration::ZERO,
        }
    }

    /// time at the start of the current update
    pub fn now(&self) -> SystemTime {
        self.now
    }

    /// time since the previous update
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// time since construction
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn update(&mut self) {
        self.update_at(SystemTime::now());
    }

    /// Refreshes from `now`. If the wall clock went backwards the affected
    /// span reads as zero and a warning is logged.
    pub fn update_at(&mut self, now: SystemTime) {
        self.elapsed = now.duration_since(self.now).unwrap_or_else(|e| {
            warn!(
                backwards_by = ?e.duration(),
                "wall clock moved backwards, elapsed time clamped to zero"
            );
            Duration::ZERO
        });
        self.total = now.duration_since(self.start).unwrap_or(Duration::ZERO);
        self.now = now;
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_and_total() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let mut time = GameTime::starting_at(start);
        time.update_at(start + Duration::from_millis(25));
        assert_eq!(time.elapsed(), Duration::from_millis(25));
        time.update_at(start + Duration::from_millis(65));
        assert_eq!(time.elapsed(), Duration::from_millis(40));
        assert_eq!(time.total(), Duration::from_millis(65));
        assert_eq!(time.now(), start + Duration::from_millis(65));
    }

    #[test]
    fn backwards_clock_reads_as_zero() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let mut time = GameTime::starting_at(start);
        time.update_at(start + Duration::from_secs(2));
        time.update_at(start + Duration::from_secs(1));
        assert_eq!(time.elapsed(), Duration::ZERO);
        assert_eq!(time.total(), Duration::from_secs(1));
        time.update_at(start - Duration::from_secs(1));
        assert_eq!(time.total(), Duration::ZERO);
    }

    #[test]
    fn real_clock_advances() {
        let mut time = GameTime::new();
        std::thread::sleep(Duration::from_millis(5));
        time.update();
        assert!(time.total() >= Duration::from_millis(5));
    }
}
