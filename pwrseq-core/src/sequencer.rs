//! The power sequencing state machine, advanced once per poll cycle.

/// Top-level power state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Power output de-asserted; the host is unpowered.
    Off,
    /// Power output asserted; the host is in control of its own shutdown.
    On,
    /// Power has just been cut; waiting for the rails to settle before
    /// sleeping.
    TurningOff,
}

/// Raw input sample for one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// Physical push-button, true while held down.
    pub button_pressed: bool,
    /// True while the host compute module asserts that it wants power.
    pub host_power_request: bool,
}

/// Drive mode of the button line mirrored toward the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostButtonSignal {
    /// Released: the line floats and the host-side pull-up reads it high.
    HighImpedance,
    /// Pressed: the line is actively driven low.
    DrivenLow,
}

/// Complete output assignment for one poll cycle. Idempotent; the control
/// loop may re-assert it every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outputs {
    /// Logical power switch state. Electrical polarity is the firmware's
    /// concern.
    pub power_enabled: bool,
    /// Button state mirrored toward the host.
    pub host_button: HostButtonSignal,
}

/// Follow-up the control loop must perform after applying a cycle's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleAction {
    /// Keep polling at the regular cadence.
    Continue,
    /// The power cut has settled: suspend until a wake edge, then force a
    /// full system restart.
    SleepAndRestart,
}

/// Result of advancing the sequencer by one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleStep {
    pub outputs: Outputs,
    pub action: CycleAction,
}

/// Cycle-count thresholds for the hold and idle timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    /// Button hold in `Off` that asserts the power output. Nominal 1 s.
    pub power_on_hold_cycles: u32,
    /// Button hold in `On` that forces the power off. Nominal 4 s.
    pub forced_off_hold_cycles: u32,
    /// Idle time in `Off` before the stuck-on safety re-disable. Nominal 10 s.
    pub idle_off_cycles: u32,
    /// Settle time in `TurningOff` before sleep is allowed. Nominal 3 s.
    pub settle_cycles: u32,
}

impl Timings {
    /// Derives the nominal thresholds from the poll period, rounding the
    /// one-second cycle count to the nearest whole cycle.
    pub const fn from_poll_period_ms(poll_period_ms: u32) -> Self {
        let one_second = (1000 + poll_period_ms / 2) / poll_period_ms;
        Self {
            power_on_hold_cycles: one_second,
            forced_off_hold_cycles: 4 * one_second,
            idle_off_cycles: 10 * one_second,
            settle_cycles: 3 * one_second,
        }
    }
}

/// The power sequencing state machine.
///
/// Owns the persistent state, the hold/idle cycle counters and the current
/// output assignment. [`advance`](Self::advance) mutates all of them once
/// per poll cycle; nothing else does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSequencer {
    timings: Timings,
    state: PowerState,
    button_held_cycles: u32,
    idle_cycles: u32,
    outputs: Outputs,
}

impl PowerSequencer {
    /// A fresh sequencer: `Off`, power de-asserted, host button released.
    pub const fn new(timings: Timings) -> Self {
        Self {
            timings,
            state: PowerState::Off,
            button_held_cycles: 0,
            idle_cycles: 0,
            outputs: Outputs {
                power_enabled: false,
                host_button: HostButtonSignal::HighImpedance,
            },
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Current output assignment, as of the last `advance`.
    pub fn outputs(&self) -> Outputs {
        self.outputs
    }

    /// Advances the sequencer by one poll cycle.
    ///
    /// The counters are updated from the raw inputs first, then the
    /// transition table for the current state is evaluated top to bottom and
    /// only the first matching row is applied. The returned outputs are a
    /// complete assignment, safe to re-assert on every cycle.
    pub fn advance(&mut self, inputs: Inputs) -> CycleStep {
        if inputs.button_pressed {
            self.button_held_cycles = self.button_held_cycles.saturating_add(1);
        } else {
            self.button_held_cycles = 0;
        }
        self.idle_cycles = self.idle_cycles.saturating_add(1);

        let mut action = CycleAction::Continue;
        match self.state {
            PowerState::Off => {
                if self.idle_cycles > self.timings.idle_off_cycles {
                    // Stuck-on safety net: re-assert the off level and leave
                    // through the regular settle path. The idle counter is
                    // not reset here, so the settle threshold is already met
                    // and the next cycle arms the sleep.
                    self.outputs.power_enabled = false;
                    self.state = PowerState::TurningOff;
                } else if self.button_held_cycles > self.timings.power_on_hold_cycles {
                    // Power is switched on while the hold lasts, but the
                    // state only changes once the host acknowledges by
                    // raising its power request.
                    self.outputs.power_enabled = true;
                    self.idle_cycles = 0;
                } else if inputs.host_power_request {
                    self.outputs.power_enabled = true;
                    self.state = PowerState::On;
                }
            }
            PowerState::On => {
                if !inputs.host_power_request {
                    self.cut_power();
                } else if self.button_held_cycles > self.timings.forced_off_hold_cycles {
                    self.cut_power();
                } else if self.button_held_cycles > 0 {
                    self.outputs.host_button = HostButtonSignal::DrivenLow;
                } else {
                    self.outputs.host_button = HostButtonSignal::HighImpedance;
                }
            }
            PowerState::TurningOff => {
                // No way back from here; once the rails have settled the
                // only exit is sleep followed by a full restart.
                if self.idle_cycles > self.timings.settle_cycles {
                    action = CycleAction::SleepAndRestart;
                }
            }
        }

        CycleStep {
            outputs: self.outputs,
            action,
        }
    }

    /// Common `On` exit: cut power, release the host button line and start
    /// the settle timer.
    fn cut_power(&mut self) {
        self.outputs.power_enabled = false;
        self.outputs.host_button = HostButtonSignal::HighImpedance;
        self.idle_cycles = 0;
        self.state = PowerState::TurningOff;
    }
}
