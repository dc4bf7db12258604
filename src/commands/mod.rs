//! CLI command implementations
//!
//! Each mode of `spitest` works on any [`simplespi_core::SpiBridge`], so the
//! same code drives the FTDI hardware and the emulated bridge.

pub mod control;
pub mod message;
pub mod receive;
pub mod send;

use indicatif::ProgressStyle;

/// Create the progress bar style shared by the transfer commands
pub(crate) fn create_progress_bar_style(
    unit: &str,
) -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{eta}})",
            unit
        ))?
        .progress_chars("#>-"))
}
