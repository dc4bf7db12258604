//! FTDI MPSSE protocol constants
//!
//! Based on FTDI AN_108 (MPSSE command processor).

// ============================================================================
// USB VID/PID constants
// ============================================================================

/// FTDI vendor ID
pub const FTDI_VID: u16 = 0x0403;

/// FT2232H product ID (dual channel)
pub const FTDI_FT2232H_PID: u16 = 0x6010;

/// FT4232H product ID (quad channel)
pub const FTDI_FT4232H_PID: u16 = 0x6011;

/// FT232H product ID (single channel)
pub const FTDI_FT232H_PID: u16 = 0x6014;

// ============================================================================
// MPSSE Commands
// ============================================================================

/// Write bytes, MSB first
pub const MPSSE_DO_WRITE: u8 = 0x10;

/// Read bytes, MSB first
pub const MPSSE_DO_READ: u8 = 0x20;

/// Write on negative clock edge
pub const MPSSE_WRITE_NEG: u8 = 0x01;

/// Full-duplex byte transfer for SPI mode 0: shift out on the falling edge,
/// sample on the rising edge
pub const MPSSE_DUPLEX_MODE0: u8 = MPSSE_DO_WRITE | MPSSE_DO_READ | MPSSE_WRITE_NEG;

/// Set data bits low byte
pub const SET_BITS_LOW: u8 = 0x80;

/// Disable loopback mode
pub const LOOPBACK_END: u8 = 0x85;

/// Set clock divisor
pub const TCK_DIVISOR: u8 = 0x86;

/// Disable divide-by-5 prescaler (60 MHz clock)
pub const DIS_DIV_5: u8 = 0x8A;

/// Disable 3-phase clocking
pub const DIS_3_PHASE: u8 = 0x8D;

/// Disable adaptive clocking
pub const CLK_NO_ADAPTIVE: u8 = 0x97;

/// Send immediate (flush buffers)
pub const SEND_IMMEDIATE: u8 = 0x87;

// ============================================================================
// Limits
// ============================================================================

/// FTDI hardware buffer size in bytes
pub const FTDI_HW_BUFFER_SIZE: usize = 4096;

/// Longest single MPSSE byte transfer
pub const MAX_TRANSFER: usize = 65536;

/// MPSSE base clock for 'H' devices
pub const BASE_CLOCK_HZ: u32 = 60_000_000;

/// Default clock divisor (1 MHz at 60 MHz base clock)
pub const DEFAULT_DIVISOR: u16 = 60;

// ============================================================================
// Pin assignments (low byte)
//
// TCK/SK is bit 0.  (clock)
// TDI/DO is bit 1.  (data out)
// TDO/DI is bit 2.  (data in)
// TMS/CS is bit 3.  (chip select)
// GPIOL0..3 are bits 4..7 (control lines)
// ============================================================================

/// Bit position for SK (clock)
pub const PIN_SK: u8 = 0;

/// Bit position for DO (data out / MOSI)
pub const PIN_DO: u8 = 1;

/// Bit position for CS (chip select)
pub const PIN_CS: u8 = 3;

/// Low-byte pins usable as GPIO
pub const GPIO_MASK: u8 = 0xF0;

/// CS bits (CS high = deasserted)
pub const DEFAULT_CS_BITS: u8 = 1 << PIN_CS;

/// Default pin direction (SK, DO, CS as outputs)
pub const DEFAULT_PINDIR: u8 = (1 << PIN_SK) | (1 << PIN_DO) | (1 << PIN_CS);

// ============================================================================
// Supported device types
// ============================================================================

/// Supported FTDI device types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FtdiDeviceType {
    /// FT2232H (dual channel, 60 MHz)
    #[default]
    Ft2232H,
    /// FT4232H (quad channel, 60 MHz)
    Ft4232H,
    /// FT232H (single channel, 60 MHz)
    Ft232H,
}

impl FtdiDeviceType {
    /// Get the vendor ID for this device type
    pub fn vendor_id(&self) -> u16 {
        FTDI_VID
    }

    /// Get the product ID for this device type
    pub fn product_id(&self) -> u16 {
        match self {
            FtdiDeviceType::Ft2232H => FTDI_FT2232H_PID,
            FtdiDeviceType::Ft4232H => FTDI_FT4232H_PID,
            FtdiDeviceType::Ft232H => FTDI_FT232H_PID,
        }
    }

    /// Get the number of channels for this device type
    pub fn channel_count(&self) -> u8 {
        match self {
            FtdiDeviceType::Ft232H => 1,
            FtdiDeviceType::Ft2232H => 2,
            FtdiDeviceType::Ft4232H => 4,
        }
    }

    /// Parse device type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "2232h" | "ft2232h" => Some(FtdiDeviceType::Ft2232H),
            "4232h" | "ft4232h" => Some(FtdiDeviceType::Ft4232H),
            "232h" | "ft232h" => Some(FtdiDeviceType::Ft232H),
            _ => None,
        }
    }

    /// Get the name of this device type
    pub fn name(&self) -> &'static str {
        match self {
            FtdiDeviceType::Ft2232H => "FT2232H",
            FtdiDeviceType::Ft4232H => "FT4232H",
            FtdiDeviceType::Ft232H => "FT232H",
        }
    }
}

/// FTDI interface/channel selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FtdiInterface {
    /// Channel A (default)
    #[default]
    A,
    /// Channel B
    B,
    /// Channel C
    C,
    /// Channel D
    D,
}

impl FtdiInterface {
    /// Parse interface from character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(FtdiInterface::A),
            'B' => Some(FtdiInterface::B),
            'C' => Some(FtdiInterface::C),
            'D' => Some(FtdiInterface::D),
            _ => None,
        }
    }

    /// Get the interface index (0-3)
    pub fn index(&self) -> u8 {
        match self {
            FtdiInterface::A => 0,
            FtdiInterface::B => 1,
            FtdiInterface::C => 2,
            FtdiInterface::D => 3,
        }
    }

    /// Get the channel letter
    pub fn letter(&self) -> char {
        (b'A' + self.index()) as char
    }
}

/// Supported FTDI devices for enumeration
pub struct SupportedDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_name: &'static str,
}

/// List of all supported FTDI devices
pub const SUPPORTED_DEVICES: &[SupportedDevice] = &[
    SupportedDevice {
        vendor_id: FTDI_VID,
        product_id: FTDI_FT2232H_PID,
        device_name: "FT2232H",
    },
    SupportedDevice {
        vendor_id: FTDI_VID,
        product_id: FTDI_FT4232H_PID,
        device_name: "FT4232H",
    },
    SupportedDevice {
        vendor_id: FTDI_VID,
        product_id: FTDI_FT232H_PID,
        device_name: "FT232H",
    },
];

/// Get device info for a VID/PID pair
pub fn get_device_info(vid: u16, pid: u16) -> Option<&'static SupportedDevice> {
    SUPPORTED_DEVICES
        .iter()
        .find(|d| d.vendor_id == vid && d.product_id == pid)
}

/// Encode a byte count as the MPSSE little-endian `length - 1` field
pub fn length_field(len: usize) -> [u8; 2] {
    let n = (len - 1) as u16;
    n.to_le_bytes()
}
