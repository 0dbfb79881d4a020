use std::sync::{Mutex, MutexGuard};

use gvl_types::Timestamp;

/// Source of the "current time" signal fed to the ledger and voting engine.
///
/// Implementations must be monotonic: a value is never smaller than one
/// returned before it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock in whole seconds, clamped so it never runs backwards.
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Timestamp::zero()),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let mut last = lock(&self.last);
        let wall = Timestamp::now();
        if wall > *last {
            *last = wall;
        }
        *last
    }
}

/// Hand-driven clock for tests, scripts, and simulations.
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move forward by `secs`, saturating at the end of time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let mut current = lock(&self.current);
        *current = current.saturating_add_secs(secs);
        *current
    }

    /// Jump to `to`. Earlier instants are ignored so the clock stays monotonic.
    pub fn set(&self, to: Timestamp) -> Timestamp {
        let mut current = lock(&self.current);
        if to > *current {
            *current = to;
        }
        *current
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *lock(&self.current)
    }
}

// A Timestamp is always in a valid state, so a poisoned guard is still usable.
fn lock(mutex: &Mutex<Timestamp>) -> MutexGuard<'_, Timestamp> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn manual_clock_advances_and_never_rewinds() {
        let clock = ManualClock::new(Timestamp::from_secs(100));
        assert_eq!(clock.now(), Timestamp::from_secs(100));
        assert_eq!(clock.advance(5), Timestamp::from_secs(105));
        assert_eq!(clock.set(Timestamp::from_secs(50)), Timestamp::from_secs(105));
        assert_eq!(clock.set(Timestamp::from_secs(200)), Timestamp::from_secs(200));
        assert_eq!(clock.now(), Timestamp::from_secs(200));
    }

    #[test]
    fn manual_clock_saturates() {
        let clock = ManualClock::new(Timestamp::from_secs(u64::MAX - 1));
        assert_eq!(clock.advance(10), Timestamp::from_secs(u64::MAX));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let mut prev = clock.now();
        assert!(prev > Timestamp::zero());
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn concurrent_reads_are_monotonic_per_thread() {
        let clock = Arc::new(SystemClock::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || {
                    let mut prev = clock.now();
                    for _ in 0..500 {
                        let next = clock.now();
                        assert!(next >= prev);
                        prev = next;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
