#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

mod config;
mod config_resources;
mod tasks;

use crate::config_resources::{AssignedResources, SequencerResources};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("pwrseq firmware {} starting up", config::FW_VERSION_STR);

    // The watchdog stays unarmed here; the sequencer arms it only to force
    // the post-off restart.
    spawner
        .spawn(tasks::sequencer::sequencer_task(r.sequencer))
        .unwrap();
}
