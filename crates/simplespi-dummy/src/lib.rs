//! simplespi-dummy - In-memory bridge and device emulator for testing
//!
//! This crate provides a bridge that never touches USB. It records every
//! GPIO change, delay and transmitted byte, and plays the device side of the
//! link: it loops direct messages back, acknowledges uploaded patches with
//! their echo, and serves a read-back buffer for captures.

use std::collections::VecDeque;
use std::time::Duration;

use simplespi_core::bridge::{ControlPins, SpiBridge};
use simplespi_core::error::Result;
use simplespi_core::protocol::echo::{expected_echo, ECHO_WORD};
use simplespi_core::protocol::record::{PATCH_RECORDS, RECORD_SIZE};

/// Configuration for the emulated device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Acknowledge uploaded patches with their echo
    pub echo_patches: bool,
    /// Exchange within the following patch that carries the echo
    pub echo_lag: usize,
    /// Data shifted out for reads with an empty write
    pub readback: Vec<u8>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            echo_patches: true,
            echo_lag: 3,
            readback: Vec::new(),
        }
    }
}

/// A GPIO operation seen by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    /// Direction change
    Direction {
        /// Pins affected
        pins: ControlPins,
        /// New direction of those pins
        direction: ControlPins,
    },
    /// Output write
    Write(ControlPins),
}

/// Emulated bridge
pub struct DummyBridge {
    config: DummyConfig,
    gpio_events: Vec<GpioEvent>,
    delays: Vec<Duration>,
    written: Vec<Vec<u8>>,
    outputs: ControlPins,
    level: ControlPins,
    pending_echoes: VecDeque<[u8; RECORD_SIZE]>,
    readback_pos: usize,
}

impl DummyBridge {
    /// Create a new emulated bridge with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            gpio_events: Vec::new(),
            delays: Vec::new(),
            written: Vec::new(),
            outputs: ControlPins::empty(),
            level: ControlPins::empty(),
            pending_echoes: VecDeque::new(),
            readback_pos: 0,
        }
    }

    /// Create an emulated bridge with the default device behaviour
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a bridge whose device never acknowledges patches
    pub fn silent() -> Self {
        Self::new(DummyConfig {
            echo_patches: false,
            ..DummyConfig::default()
        })
    }

    /// Create a bridge that serves `data` to reads
    pub fn with_readback(data: Vec<u8>) -> Self {
        Self::new(DummyConfig {
            readback: data,
            ..DummyConfig::default()
        })
    }

    /// GPIO operations in the order they happened
    pub fn gpio_events(&self) -> &[GpioEvent] {
        &self.gpio_events
    }

    /// Delays requested so far
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Write buffers of every exchange
    pub fn written(&self) -> &[Vec<u8>] {
        &self.written
    }

    /// Current level of the control lines that are outputs
    pub fn level(&self) -> ControlPins {
        self.level & self.outputs
    }

    fn device_response(&mut self, write: &[u8], len: usize) -> Vec<u8> {
        if write.is_empty() {
            let start = self.readback_pos.min(self.config.readback.len());
            let end = (start + len).min(self.config.readback.len());
            let mut out = self.config.readback[start..end].to_vec();
            out.resize(len, 0xFF);
            self.readback_pos += len;
            return out;
        }

        let index = self.written.len();
        let mut out = write.to_vec();
        out.resize(len, 0x00);

        if self.config.echo_patches && write.len() == RECORD_SIZE {
            let slot = index % PATCH_RECORDS;
            if index >= PATCH_RECORDS && slot == self.config.echo_lag {
                if let Some(echo) = self.pending_echoes.pop_front() {
                    log::trace!("Device echoes {:02x?}", &echo[..ECHO_WORD]);
                    out[..RECORD_SIZE].copy_from_slice(&echo);
                }
            }
            if slot == 0 {
                self.pending_echoes.push_back(expected_echo(write));
            }
        }

        out
    }
}

impl SpiBridge for DummyBridge {
    fn exchange(&mut self, write: &[u8], read_len: usize) -> Result<Vec<u8>> {
        let len = write.len().max(read_len);
        let out = self.device_response(write, len);
        self.written.push(write.to_vec());
        Ok(out)
    }

    fn set_gpio_direction(&mut self, pins: ControlPins, direction: ControlPins) -> Result<()> {
        self.outputs = (self.outputs - pins) | (direction & pins);
        self.level -= pins;
        self.gpio_events
            .push(GpioEvent::Direction { pins, direction });
        Ok(())
    }

    fn write_gpio(&mut self, value: ControlPins) -> Result<()> {
        self.level = value;
        self.gpio_events.push(GpioEvent::Write(value));
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}
