//! Bridge trait and auxiliary control lines
//!
//! A bridge is a USB device that masters the SPI bus towards the device under
//! test and also owns a few general purpose pins. On the bring-up board those
//! pins drive the JTAG reset lines and the SPI/JTAG selector, which share the
//! physical connector with the SPI signals.

use std::time::Duration;

use bitflags::bitflags;

use crate::error::Result;

bitflags! {
    /// Auxiliary control lines on the bridge's low GPIO byte
    ///
    /// Bit 4 and 5 are the JTAG reset lines, bit 6 selects which of the two
    /// links the device listens to (low = SPI, high = JTAG).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlPins: u8 {
        /// JTAG TRST_N
        const TRST_N   = 1 << 4;
        /// JTAG SRST_N (system reset, holds the chip in reset when low)
        const SRST_N   = 1 << 5;
        /// SPI/JTAG selector
        const JTAG_SEL = 1 << 6;
    }
}

/// Which link the device under test listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// SPI selected, both resets released
    Spi,
    /// JTAG selected, both resets released
    Jtag,
}

impl LinkMode {
    /// GPIO pattern that selects this mode
    pub fn pins(self) -> ControlPins {
        match self {
            LinkMode::Spi => ControlPins::TRST_N | ControlPins::SRST_N,
            LinkMode::Jtag => ControlPins::all(),
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            LinkMode::Spi => "SPI",
            LinkMode::Jtag => "JTAG",
        }
    }
}

/// A USB bridge that can exchange bytes over SPI and drive GPIO lines
///
/// Every exchange is synchronous and full duplex: the bridge clocks out
/// `write` (zero padded to `read_len` if shorter) while clocking in the same
/// number of bytes, and returns what was read.
pub trait SpiBridge {
    /// Perform one full-duplex SPI transaction with chip select asserted
    ///
    /// Returns `max(write.len(), read_len)` bytes.
    fn exchange(&mut self, write: &[u8], read_len: usize) -> Result<Vec<u8>>;

    /// Configure GPIO direction
    ///
    /// Pins set in `pins` become outputs where `direction` has the bit set
    /// and inputs otherwise. Pins switched to output start driven low.
    fn set_gpio_direction(&mut self, pins: ControlPins, direction: ControlPins) -> Result<()>;

    /// Drive the GPIO outputs
    fn write_gpio(&mut self, value: ControlPins) -> Result<()>;

    /// Block for the given time
    ///
    /// The link has no flow control, so every bit of pacing goes through here.
    fn delay(&mut self, duration: Duration);
}

impl<B: SpiBridge + ?Sized> SpiBridge for Box<B> {
    fn exchange(&mut self, write: &[u8], read_len: usize) -> Result<Vec<u8>> {
        (**self).exchange(write, read_len)
    }

    fn set_gpio_direction(&mut self, pins: ControlPins, direction: ControlPins) -> Result<()> {
        (**self).set_gpio_direction(pins, direction)
    }

    fn write_gpio(&mut self, value: ControlPins) -> Result<()> {
        (**self).write_gpio(value)
    }

    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_mode_patterns() {
        assert_eq!(LinkMode::Spi.pins().bits(), 0x30);
        assert_eq!(LinkMode::Jtag.pins().bits(), 0x70);
    }
}
