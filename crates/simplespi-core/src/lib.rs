//! simplespi-core - Link framing for FPGA bring-up over a USB SPI bridge
//!
//! This crate holds everything `spitest` does that does not depend on a
//! particular USB bridge:
//!
//! - [`bridge`]: the [`SpiBridge`] trait implemented by hardware and emulated
//!   backends, plus the auxiliary control lines that select SPI or JTAG
//! - [`protocol`]: the byte framing used on the link (4-byte direct messages,
//!   8-byte records grouped into 1024-byte patches, echo verification and the
//!   read-back capture with its trimming rule)
//!
//! # Example
//!
//! ```ignore
//! use simplespi_core::bridge::{LinkMode, SpiBridge};
//! use simplespi_core::protocol::{control, message};
//!
//! control::init_control_lines(&mut bridge)?;
//! control::select(&mut bridge, LinkMode::Spi)?;
//!
//! let payload = message::pad(message::from_tokens(&["hello"]));
//! message::exchange_chunks(&mut bridge, &payload, |echoed| {
//!     println!("Got {:02x?}", echoed);
//! })?;
//! ```

pub mod bridge;
pub mod error;
pub mod protocol;

pub use bridge::{ControlPins, LinkMode, SpiBridge};
pub use error::{Error, Result};
