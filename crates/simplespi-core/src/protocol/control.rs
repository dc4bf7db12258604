//! SPI/JTAG selector handling

use std::time::Duration;

use crate::bridge::{ControlPins, LinkMode, SpiBridge};
use crate::error::Result;

/// Time the selector is driven alone before the reset lines become outputs
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How long each mode is held while flipping
pub const FLIP_DWELL: Duration = Duration::from_secs(2);

/// Number of SPI/JTAG cycles performed by a flip test
pub const FLIP_CYCLES: usize = 10;

/// Bring the control lines up after the bridge was opened
///
/// Switching a pin to output forces it low. SRST_N low would hold the chip
/// in reset, so the selector is driven first and the reset lines only once
/// the device had time to settle.
pub fn init_control_lines<B: SpiBridge + ?Sized>(bridge: &mut B) -> Result<()> {
    log::debug!("Driving SPI/JTAG selector");
    bridge.set_gpio_direction(ControlPins::JTAG_SEL, ControlPins::JTAG_SEL)?;
    bridge.delay(SETTLE_DELAY);

    log::debug!("Driving JTAG reset lines");
    bridge.set_gpio_direction(ControlPins::all(), ControlPins::all())
}

/// Route the shared connector to the given link
pub fn select<B: SpiBridge + ?Sized>(bridge: &mut B, mode: LinkMode) -> Result<()> {
    log::debug!("Selecting {} (GPIO 0x{:02X})", mode.name(), mode.pins().bits());
    bridge.write_gpio(mode.pins())
}

/// Toggle between SPI and JTAG `cycles` times, holding each for `dwell`
///
/// `on_select` is called right before each switch.
pub fn flip<B, F>(bridge: &mut B, cycles: usize, dwell: Duration, mut on_select: F) -> Result<()>
where
    B: SpiBridge + ?Sized,
    F: FnMut(LinkMode),
{
    for _ in 0..cycles {
        for mode in [LinkMode::Spi, LinkMode::Jtag] {
            on_select(mode);
            select(bridge, mode)?;
            bridge.delay(dwell);
        }
    }
    Ok(())
}
