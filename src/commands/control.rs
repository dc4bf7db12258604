//! Control-line commands: bring-up, JTAG select and flip test

use simplespi_core::protocol::control;
use simplespi_core::{LinkMode, SpiBridge};

/// Prepare the control lines after the bridge was opened
pub fn bring_up(bridge: &mut dyn SpiBridge) -> Result<(), Box<dyn std::error::Error>> {
    control::init_control_lines(bridge)?;
    Ok(())
}

/// Route the connector to JTAG and leave it there
pub fn run_jtag(bridge: &mut dyn SpiBridge) -> Result<(), Box<dyn std::error::Error>> {
    control::select(bridge, LinkMode::Jtag)?;
    log::info!("JTAG selected");
    Ok(())
}

/// Route the connector to SPI, optionally saying so on stdout
pub fn select_spi(bridge: &mut dyn SpiBridge, announce: bool) -> Result<(), Box<dyn std::error::Error>> {
    if announce {
        println!("Select SPI");
    }
    control::select(bridge, LinkMode::Spi)?;
    Ok(())
}

/// Toggle between SPI and JTAG so the switch can be observed on a scope
pub fn run_flip(bridge: &mut dyn SpiBridge) -> Result<(), Box<dyn std::error::Error>> {
    control::flip(bridge, control::FLIP_CYCLES, control::FLIP_DWELL, |mode| {
        println!("Select {}", mode.name())
    })?;
    Ok(())
}
