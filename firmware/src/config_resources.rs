// Provide a mapping for the controller GPIO pins

//
//| GPIO # | Name     | Description                                                   |
//| ------ | -------- | ------------------------------------------------------------- |
//| 2      | PWR_BTN  | Input from the physical power button. Active low, pull-up.    |
//| 9      | HOST_BTN | Button line mirrored to the host module. Driven low to        |
//|        |          | emulate a press, otherwise high-impedance (host-side pull-up).|
//| 15     | HOST_REQ | Power request from the host module. Active high.              |
//| 19     | PWR_EN   | Power switch enable output. Active low.                       |
//
// All other pins are not connected on this board.

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
  sequencer: SequencerResources {
    pwr_btn: PIN_2,
    host_btn: PIN_9,
    host_req: PIN_15,
    pwr_en: PIN_19,
    watchdog: WATCHDOG,
  },
}
