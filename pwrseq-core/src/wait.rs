//! Blocking millisecond waits over a narrow free-running counter.
//!
//! Used where the async timer queue cannot be relied on, such as the spin
//! after the restart watchdog has been armed. The counter may wrap many
//! times during one wait; each millisecond step uses wrapping distance
//! arithmetic, so a wrap inside a step is harmless.

/// A free-running hardware counter with wrapping semantics.
pub trait FreeRunningCounter {
    /// Counter ticks per millisecond.
    const TICKS_PER_MS: u16;

    /// Current raw counter value; wraps at the u16 boundary.
    fn read(&self) -> u16;
}

/// Blocks for approximately `ms` milliseconds measured on `counter`.
///
/// Never returns early. Each millisecond step waits until the counter has
/// moved a full millisecond past the previous step's target rather than past
/// whatever value was last observed, so read-granularity overshoot does not
/// accumulate across steps.
pub fn wait_ms<C: FreeRunningCounter>(counter: &C, ms: u16) {
    let mut mark = counter.read();
    for _ in 0..ms {
        while counter.read().wrapping_sub(mark) < C::TICKS_PER_MS {
            core::hint::spin_loop();
        }
        mark = mark.wrapping_add(C::TICKS_PER_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Counter that advances a fixed number of ticks on every read,
    /// simulating time passing while the caller spins.
    struct SimCounter {
        now: Cell<u16>,
        ticks_per_read: u16,
        total_ticks: Cell<u32>,
    }

    impl SimCounter {
        fn starting_at(start: u16, ticks_per_read: u16) -> Self {
            Self {
                now: Cell::new(start),
                ticks_per_read,
                total_ticks: Cell::new(0),
            }
        }

        /// Total simulated time spent in the wait, in ticks.
        fn elapsed_ticks(&self) -> u32 {
            self.total_ticks.get()
        }
    }

    impl FreeRunningCounter for SimCounter {
        const TICKS_PER_MS: u16 = 16;

        fn read(&self) -> u16 {
            let value = self.now.get();
            self.now.set(value.wrapping_add(self.ticks_per_read));
            self.total_ticks
                .set(self.total_ticks.get() + u32::from(self.ticks_per_read));
            value
        }
    }

    #[test]
    fn waits_at_least_the_requested_duration() {
        let counter = SimCounter::starting_at(0, 1);
        wait_ms(&counter, 3);
        assert!(counter.elapsed_ticks() >= 48);
        assert!(counter.elapsed_ticks() <= 52);
    }

    #[test]
    fn zero_duration_returns_after_the_initial_read() {
        let counter = SimCounter::starting_at(0, 1);
        wait_ms(&counter, 0);
        assert_eq!(counter.elapsed_ticks(), 1);
    }

    #[test]
    fn tolerates_counter_wraparound_mid_wait() {
        // first step crosses the u16 boundary
        let counter = SimCounter::starting_at(u16::MAX - 5, 1);
        wait_ms(&counter, 2);
        assert!(counter.elapsed_ticks() >= 32);
        assert!(counter.elapsed_ticks() <= 36);
    }

    #[test]
    fn coarse_counter_overshoots_but_never_under_waits() {
        // seven ticks per read never lands exactly on a step boundary
        let counter = SimCounter::starting_at(0, 7);
        wait_ms(&counter, 4);
        assert!(counter.elapsed_ticks() >= 64);
        assert!(counter.elapsed_ticks() <= 64 + 28);
    }
}
