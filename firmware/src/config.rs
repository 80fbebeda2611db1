use pwrseq_core::Timings;

/// Cadence of the input poll / state machine cycle.
pub const POLL_PERIOD_MS: u32 = 10; // ms

/// Hold and settle thresholds derived from the poll cadence.
pub const TIMINGS: Timings = Timings::from_poll_period_ms(POLL_PERIOD_MS);

// Watchdog timeout for the forced restart after a wake edge. The sequencer
// arms the watchdog and stops feeding it, so the reset fires this much later.
pub const RESTART_WATCHDOG_TIMEOUT_MS: u64 = 16; // ms

// How long to spin after arming the restart watchdog. Longer than the
// timeout above, so the reset lands inside the spin.
pub const RESTART_SPIN_MS: u16 = 30; // ms

pub const FW_VERSION_STR: &str = "0.3.1";
