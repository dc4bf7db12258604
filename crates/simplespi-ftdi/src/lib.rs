//! simplespi-ftdi - FTDI MPSSE bridge backend
//!
//! This crate drives an FTDI 'H' series device as the SPI master towards the
//! board under test, and uses the free GPIOL pins of the same channel as the
//! SPI/JTAG control lines.
//!
//! # Supported Devices
//!
//! - FTDI FT2232H (dual channel, 60 MHz) - default, channel A
//! - FTDI FT4232H (quad channel, 60 MHz)
//! - FTDI FT232H (single channel, 60 MHz)
//!
//! # Example
//!
//! ```no_run
//! use simplespi_core::bridge::SpiBridge;
//! use simplespi_ftdi::{Ftdi, FtdiConfig};
//!
//! // FT2232H channel A, SPI mode 0 at 1 MHz
//! let mut ftdi = Ftdi::open(&FtdiConfig::default())?;
//! let echoed = ftdi.exchange(b"1234", 0)?;
//! println!("Got {:02x?}", echoed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Bridge Options
//!
//! - `type=<device>` - Device type (2232h, 4232h, 232h)
//! - `port=<A|B|C|D>` - Channel to use (default: A)
//! - `divisor=<N>` - Clock divisor (2-65534, even; default: 60)
//!
//! # SPI Clock Speed
//!
//! ```text
//! SPI_clock = 60 MHz / divisor
//! ```
//!
//! | Divisor | SPI Clock |
//! |---------|-----------|
//! | 6       | 10 MHz    |
//! | 60      | 1 MHz     |
//! | 600     | 100 kHz   |

mod device;
mod error;
mod protocol;

pub use device::{parse_options, split_options, Ftdi, FtdiConfig, FtdiDeviceInfo};
pub use error::{FtdiError, Result};
pub use protocol::{FtdiDeviceType, FtdiInterface};

/// Version of the `ftdi` driver crate this backend was built against
pub const DRIVER_VERSION: &str = env!("SIMPLESPI_FTDI_DRIVER_VERSION");

/// Open a bridge from an option string such as `type=2232h,port=A`
pub fn open(options: &str) -> Result<Ftdi> {
    let config = parse_options(&split_options(options))?;
    Ftdi::open(&config)
}
