#![no_std]

//! Power sequencing logic for a battery-operated device: a push-button and a
//! host power-request line in, a power-switch enable and a mirrored button
//! line out. The state machine, its hold/idle timing and the sleep decision
//! live here; pin polarities, the poll timer and the actual suspend/restart
//! are the firmware's concern.
//!
//! Everything is synchronous and allocation-free so the whole crate can be
//! exercised with host-run unit tests.

pub mod sequencer;
pub mod wait;

pub use sequencer::{
    CycleAction, CycleStep, HostButtonSignal, Inputs, Outputs, PowerSequencer, PowerState, Timings,
};
