//! FTDI MPSSE device implementation
//!
//! This module provides the `Ftdi` struct that performs full-duplex SPI
//! exchanges and GPIO control using FTDI's MPSSE engine, and implements the
//! `SpiBridge` trait.

use std::io::{Read, Write};
use std::time::Duration;

use ftdi::{find_by_vid_pid, BitMode, Device, Interface};
use simplespi_core::bridge::{ControlPins, SpiBridge};
use simplespi_core::error::Result as CoreResult;

use crate::error::{FtdiError, Result};
use crate::protocol::*;

/// Configuration for opening an FTDI device
#[derive(Debug, Clone)]
pub struct FtdiConfig {
    /// Device type (determines VID/PID and channel count)
    pub device_type: FtdiDeviceType,
    /// Interface/channel to use (A, B, C, D)
    pub interface: FtdiInterface,
    /// Clock divisor (2-65534, must be even)
    /// SPI clock = 60 MHz / divisor
    pub divisor: u16,
}

impl Default for FtdiConfig {
    fn default() -> Self {
        Self::for_device(FtdiDeviceType::default())
    }
}

impl FtdiConfig {
    /// Create a new config for a specific device type
    pub fn for_device(device_type: FtdiDeviceType) -> Self {
        FtdiConfig {
            device_type,
            interface: FtdiInterface::default(),
            divisor: DEFAULT_DIVISOR,
        }
    }

    /// Set the interface/channel
    pub fn interface(mut self, interface: FtdiInterface) -> Result<Self> {
        let max_channel = self.device_type.channel_count();
        if interface.index() >= max_channel {
            return Err(FtdiError::InvalidChannel(format!(
                "Channel {} not available on {} (max: {})",
                interface.letter(),
                self.device_type.name(),
                (b'A' + max_channel - 1) as char
            )));
        }
        self.interface = interface;
        Ok(self)
    }

    /// Set the clock divisor
    pub fn divisor(mut self, divisor: u16) -> Result<Self> {
        if divisor < 2 || divisor % 2 != 0 {
            return Err(FtdiError::InvalidParameter(format!(
                "Invalid divisor {}: must be even, between 2 and 65534",
                divisor
            )));
        }
        self.divisor = divisor;
        Ok(self)
    }

    /// SPI clock frequency in Hz
    pub fn spi_clock_hz(&self) -> u32 {
        BASE_CLOCK_HZ / self.divisor as u32
    }
}

/// FTDI MPSSE bridge
///
/// Chip select sits on ADBUS3; the control lines are the GPIOL pins on
/// ADBUS4..7.
pub struct Ftdi {
    /// libftdi device context
    device: Device,
    /// CS bits (driven when CS is deasserted)
    cs_bits: u8,
    /// Current GPIO output levels
    aux_bits: u8,
    /// Pin direction
    pindir: u8,
}

impl Ftdi {
    /// Open an FTDI device with the given configuration
    pub fn open(config: &FtdiConfig) -> Result<Self> {
        log::info!(
            "Opening FTDI {} channel {}",
            config.device_type.name(),
            config.interface.letter()
        );

        let interface = match config.interface {
            FtdiInterface::A => Interface::A,
            FtdiInterface::B => Interface::B,
            FtdiInterface::C => Interface::C,
            FtdiInterface::D => Interface::D,
        };

        let vid = config.device_type.vendor_id();
        let pid = config.device_type.product_id();

        log::debug!("Looking for FTDI device VID={:04X} PID={:04X}", vid, pid);

        let mut device = match find_by_vid_pid(vid, pid).interface(interface).open() {
            Ok(device) => device,
            Err(e) => {
                return Err(if is_present(vid, pid) {
                    FtdiError::OpenFailed(e.to_string())
                } else {
                    FtdiError::DeviceNotFound(config.device_type.name())
                });
            }
        };

        log::debug!("Opened FTDI device VID={:04X} PID={:04X}", vid, pid);

        device
            .usb_reset()
            .map_err(|e| FtdiError::ConfigFailed(format!("USB reset failed: {}", e)))?;

        device
            .set_latency_timer(2)
            .map_err(|e| FtdiError::ConfigFailed(format!("Set latency timer failed: {}", e)))?;

        device
            .set_bitmode(0x00, BitMode::Mpsse)
            .map_err(|e| FtdiError::ConfigFailed(format!("Set MPSSE mode failed: {}", e)))?;

        let mut ftdi = Ftdi {
            device,
            cs_bits: DEFAULT_CS_BITS,
            aux_bits: 0,
            pindir: DEFAULT_PINDIR,
        };

        ftdi.init_mpsse(config)?;

        log::info!(
            "FTDI configured for SPI mode 0 at {} kHz",
            config.spi_clock_hz() / 1000
        );

        Ok(ftdi)
    }

    /// Initialize the MPSSE engine
    fn init_mpsse(&mut self, config: &FtdiConfig) -> Result<()> {
        let mut buf = Vec::with_capacity(16);

        log::debug!("Disabling divide-by-5 prescaler, adaptive and 3-phase clocking");
        buf.push(DIS_DIV_5);
        buf.push(CLK_NO_ADAPTIVE);
        buf.push(DIS_3_PHASE);

        // Divisor value for MPSSE is (divisor / 2 - 1)
        let divisor_val = config.divisor / 2 - 1;
        log::debug!(
            "Setting clock divisor to {} (SPI clock: {} Hz)",
            config.divisor,
            config.spi_clock_hz()
        );
        buf.push(TCK_DIVISOR);
        buf.extend_from_slice(&divisor_val.to_le_bytes());

        buf.push(LOOPBACK_END);

        log::debug!(
            "Setting data bits: cs_bits=0x{:02X} pindir=0x{:02X}",
            self.cs_bits,
            self.pindir
        );
        buf.extend_from_slice(&self.idle_bits());

        self.send(&buf)
    }

    /// SET_BITS_LOW command with CS deasserted
    fn idle_bits(&self) -> [u8; 3] {
        [SET_BITS_LOW, self.cs_bits | self.aux_bits, self.pindir]
    }

    /// Send data to the FTDI device
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.device
            .write_all(data)
            .map_err(|e| FtdiError::TransferFailed(format!("Write failed: {}", e)))?;
        log::trace!("Sent {} bytes", data.len());
        Ok(())
    }

    /// Receive data from the FTDI device
    fn recv(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut total = 0;

        while total < len {
            match self.device.read(&mut buf[total..]) {
                Ok(0) => {
                    std::thread::sleep(Duration::from_micros(100));
                }
                Ok(n) => {
                    total += n;
                }
                Err(e) => {
                    return Err(FtdiError::TransferFailed(format!("Read failed: {}", e)));
                }
            }
        }

        log::trace!("Received {} bytes", total);
        Ok(buf)
    }

    /// Perform a full-duplex SPI transfer of `max(write.len(), read_len)` bytes
    fn spi_transfer(&mut self, write_data: &[u8], read_len: usize) -> Result<Vec<u8>> {
        let len = write_data.len().max(read_len);
        if len == 0 {
            return Ok(Vec::new());
        }
        if len > MAX_TRANSFER {
            return Err(FtdiError::TransferFailed(
                "Transfer length exceeds 64KB limit".to_string(),
            ));
        }

        let mut buf = Vec::with_capacity(FTDI_HW_BUFFER_SIZE.min(len + 16));

        // Assert CS
        buf.push(SET_BITS_LOW);
        buf.push(self.aux_bits);
        buf.push(self.pindir);

        buf.push(MPSSE_DUPLEX_MODE0);
        buf.extend_from_slice(&length_field(len));
        buf.extend_from_slice(write_data);
        buf.resize(buf.len() + (len - write_data.len()), 0x00);

        // Deassert CS
        buf.extend_from_slice(&self.idle_bits());

        buf.push(SEND_IMMEDIATE);

        self.send(&buf)?;
        self.recv(len)
    }

    /// Release I/O pins (set all as inputs)
    fn release_pins(&mut self) -> Result<()> {
        let buf = [SET_BITS_LOW, 0x00, 0x00];
        self.send(&buf)
    }

    /// List connected FTDI devices this backend can drive
    pub fn list_devices() -> Result<Vec<FtdiDeviceInfo>> {
        let mut devices = Vec::new();

        for dev in nusb::list_devices()? {
            let vid = dev.vendor_id();
            let pid = dev.product_id();

            if let Some(info) = get_device_info(vid, pid) {
                devices.push(FtdiDeviceInfo {
                    bus: dev.bus_number(),
                    address: dev.device_address(),
                    vendor_id: vid,
                    product_id: pid,
                    device_name: info.device_name,
                });
            }
        }

        Ok(devices)
    }
}

/// Whether a device with this VID/PID is on the bus at all
fn is_present(vid: u16, pid: u16) -> bool {
    match Ftdi::list_devices() {
        Ok(devices) => {
            for dev in &devices {
                log::debug!("Found {}", dev);
            }
            devices
                .iter()
                .any(|d| d.vendor_id == vid && d.product_id == pid)
        }
        Err(e) => {
            log::debug!("USB enumeration failed: {}", e);
            true
        }
    }
}

impl Drop for Ftdi {
    fn drop(&mut self) {
        if let Err(e) = self.release_pins() {
            log::warn!("Failed to release pins on close: {}", e);
        }
    }
}

impl SpiBridge for Ftdi {
    fn exchange(&mut self, write: &[u8], read_len: usize) -> CoreResult<Vec<u8>> {
        Ok(self.spi_transfer(write, read_len)?)
    }

    fn set_gpio_direction(&mut self, pins: ControlPins, direction: ControlPins) -> CoreResult<()> {
        let mask = pins.bits() & GPIO_MASK;
        self.pindir = (self.pindir & !mask) | (direction.bits() & mask);
        self.aux_bits &= !mask;
        log::debug!(
            "GPIO direction: pindir=0x{:02X} aux_bits=0x{:02X}",
            self.pindir,
            self.aux_bits
        );
        let buf = self.idle_bits();
        Ok(self.send(&buf)?)
    }

    fn write_gpio(&mut self, value: ControlPins) -> CoreResult<()> {
        let outputs = self.pindir & GPIO_MASK;
        self.aux_bits = (self.aux_bits & !GPIO_MASK) | (value.bits() & outputs);
        log::debug!("GPIO write: aux_bits=0x{:02X}", self.aux_bits);
        let buf = self.idle_bits();
        Ok(self.send(&buf)?)
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Information about a connected FTDI device
#[derive(Debug, Clone)]
pub struct FtdiDeviceInfo {
    /// USB bus number
    pub bus: u8,
    /// USB device address
    pub address: u8,
    /// Vendor ID
    pub vendor_id: u16,
    /// Product ID
    pub product_id: u16,
    /// Device name
    pub device_name: &'static str,
}

impl std::fmt::Display for FtdiDeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FTDI {} at bus {} address {} ({:04X}:{:04X})",
            self.device_name, self.bus, self.address, self.vendor_id, self.product_id
        )
    }
}

/// Split a bridge option string into key/value pairs
///
/// Format: "type=2232h,port=A,divisor=60". Empty items are ignored.
pub fn split_options(options: &str) -> Vec<(&str, &str)> {
    options
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.split_once('=').unwrap_or((item, "")))
        .collect()
}

/// Parse bridge options
///
/// Keys: `type=<2232h|4232h|232h>`, `port=<A|B|C|D>`, `divisor=<N>`.
pub fn parse_options(options: &[(&str, &str)]) -> Result<FtdiConfig> {
    let mut config = FtdiConfig::default();

    for (key, value) in options {
        match *key {
            "type" => {
                let device_type = FtdiDeviceType::parse(value).ok_or_else(|| {
                    FtdiError::InvalidDeviceType(format!(
                        "Unknown device type '{}'. Valid types: 2232h, 4232h, 232h",
                        value
                    ))
                })?;
                config = FtdiConfig {
                    device_type,
                    interface: FtdiInterface::default(),
                    divisor: config.divisor,
                };
            }
            "port" | "channel" => {
                let mut chars = value.chars();
                let interface = match (chars.next(), chars.next()) {
                    (Some(c), None) => FtdiInterface::from_char(c),
                    _ => None,
                }
                .ok_or_else(|| {
                    FtdiError::InvalidChannel(format!(
                        "Invalid channel '{}': must be A, B, C, or D",
                        value
                    ))
                })?;
                config = config.interface(interface)?;
            }
            "divisor" => {
                let divisor: u16 = value.parse().map_err(|_| {
                    FtdiError::InvalidParameter(format!("Invalid divisor '{}'", value))
                })?;
                config = config.divisor(divisor)?;
            }
            _ => {
                log::warn!("Unknown FTDI option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_1mhz_2232h_channel_a() {
        let config = FtdiConfig::default();
        assert_eq!(config.device_type, FtdiDeviceType::Ft2232H);
        assert_eq!(config.interface, FtdiInterface::A);
        assert_eq!(config.spi_clock_hz(), 1_000_000);
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&split_options("type=4232h, port=c,divisor=6")).unwrap();
        assert_eq!(config.device_type, FtdiDeviceType::Ft4232H);
        assert_eq!(config.interface, FtdiInterface::C);
        assert_eq!(config.spi_clock_hz(), 10_000_000);
    }

    #[test]
    fn test_parse_options_rejects_bad_values() {
        assert!(parse_options(&[("type", "ft4222")]).is_err());
        assert!(parse_options(&[("type", "232h"), ("port", "B")]).is_err());
        assert!(parse_options(&[("divisor", "3")]).is_err());
        assert!(parse_options(&[("port", "AB")]).is_err());
    }

    #[test]
    fn test_split_options() {
        assert_eq!(
            split_options("type=2232h,,port=A"),
            vec![("type", "2232h"), ("port", "A")]
        );
        assert!(split_options("").is_empty());
    }
}
