use cortex_m::peripheral::SCB;
use defmt::{info, trace, warn};
use embassy_executor::task;
use embassy_futures::select::{Either, select};
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Instant, Ticker};
use pwrseq_core::wait::{self, FreeRunningCounter};
use pwrseq_core::{CycleAction, HostButtonSignal, Inputs, Outputs, PowerSequencer};

use crate::config::{POLL_PERIOD_MS, RESTART_SPIN_MS, RESTART_WATCHDOG_TIMEOUT_MS, TIMINGS};
use crate::config_resources::SequencerResources;

/// GPIO outputs owned by the sequencer task.
struct OutputPins {
    /// Power switch enable. Active low: driven low switches the rail on.
    pwr_en: Output<'static>,
    /// Button line mirrored to the host. Output-low emulates a press; as an
    /// input the line floats and the host-side pull-up reads it released.
    host_btn: Flex<'static>,
}

impl OutputPins {
    fn new(pwr_en: Output<'static>, mut host_btn: Flex<'static>) -> Self {
        host_btn.set_low();
        host_btn.set_as_input();
        Self { pwr_en, host_btn }
    }

    /// Re-asserts the complete output assignment. Idempotent, applied every
    /// cycle.
    fn apply(&mut self, outputs: &Outputs) {
        if outputs.power_enabled {
            self.pwr_en.set_low();
        } else {
            self.pwr_en.set_high();
        }
        match outputs.host_button {
            HostButtonSignal::HighImpedance => self.host_btn.set_as_input(),
            HostButtonSignal::DrivenLow => {
                self.host_btn.set_low();
                self.host_btn.set_as_output();
            }
        }
    }
}

/// Low 16 bits of the microsecond system timer. Backs the blocking
/// pre-restart wait, which must not depend on the async timer queue.
struct SysTimerLow16;

impl FreeRunningCounter for SysTimerLow16 {
    const TICKS_PER_MS: u16 = 1000;

    fn read(&self) -> u16 {
        Instant::now().as_ticks() as u16
    }
}

#[task]
pub async fn sequencer_task(r: SequencerResources) {
    info!("Starting power sequencer task");

    let mut button = Input::new(r.pwr_btn, Pull::Up);
    let mut host_req = Input::new(r.host_req, Pull::Down);
    let mut pins = OutputPins::new(Output::new(r.pwr_en, Level::High), Flex::new(r.host_btn));
    let mut watchdog = Watchdog::new(r.watchdog);

    let mut sequencer = PowerSequencer::new(TIMINGS);
    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS as u64));

    info!("Power sequencer task initialized");

    loop {
        ticker.next().await;

        let inputs = Inputs {
            button_pressed: button.is_low(),
            host_power_request: host_req.is_high(),
        };
        trace!("Sampled inputs: {:?}", inputs);

        let previous = sequencer.state();
        let step = sequencer.advance(inputs);
        pins.apply(&step.outputs);

        if sequencer.state() != previous {
            info!("Power state {:?} -> {:?}", previous, sequencer.state());
        }

        if step.action == CycleAction::SleepAndRestart {
            break;
        }
    }

    info!("Power cut settled, suspending until a wake edge");

    // With this task parked on the edge waits and no other task in the
    // system, the executor idles the core; this is the low-power state. The
    // settle delay has already let the host request line discharge, so a
    // stale edge cannot end the sleep early.
    match select(button.wait_for_any_edge(), host_req.wait_for_any_edge()).await {
        Either::First(()) => info!("Woken by a power button edge"),
        Either::Second(()) => info!("Woken by a host request edge"),
    }

    restart(&mut watchdog);
}

/// Forces a clean reboot instead of resuming a stale cycle after the sleep.
fn restart(watchdog: &mut Watchdog) -> ! {
    warn!("Restarting");
    watchdog.start(Duration::from_millis(RESTART_WATCHDOG_TIMEOUT_MS));
    wait::wait_ms(&SysTimerLow16, RESTART_SPIN_MS);
    // Only reachable if the watchdog reset was held off, e.g. paused by an
    // attached debug probe. Fall back to a core reset.
    SCB::sys_reset();
}
