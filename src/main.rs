//! spitest - SPI/JTAG bridge driver for FPGA bring-up
//!
//! Talks to a device under test through a USB SPI bridge whose spare GPIO
//! pins drive the JTAG reset lines and the SPI/JTAG selector.
//!
//! # Modes
//!
//! Exactly one mode runs per invocation, in this order of precedence:
//!
//! 1. `--version`: print version information and exit
//! 2. `-j`: select JTAG and exit
//! 3. `-f`: flip between SPI and JTAG ten times
//! 4. `-i <file>`: upload hex records with patch echo verification
//! 5. `-r <payload> <extra>`: capture a memory dump and trim it
//! 6. direct message: send text (or `-l N` test characters) in 4-byte chunks

mod bridges;
mod cli;
mod commands;
mod version;

use clap::Parser;
use cli::Cli;
use commands::send::SendOutcome;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger at the level picked by -v, unless RUST_LOG says otherwise
    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    if cli.version {
        version::show_and_exit();
    }

    let mut bridge = bridges::open_bridge(&cli.bridge)?;
    let bridge = bridge.as_mut();

    commands::control::bring_up(bridge)?;

    if cli.jtag {
        return commands::control::run_jtag(bridge);
    }

    commands::control::select_spi(bridge, false)?;

    if cli.flippy {
        return commands::control::run_flip(bridge);
    }

    commands::control::select_spi(bridge, true)?;

    if let Some(input) = &cli.input {
        match commands::send::run_send(bridge, input)? {
            SendOutcome::Complete { records } => log::debug!("Upload of {} records done", records),
            SendOutcome::EchoMismatch { patch } => log::debug!("Upload stopped after patch {}", patch),
        }
        return Ok(());
    }

    if let Some((payload, extra)) = cli.receive_counts() {
        commands::receive::run_receive(bridge, payload, extra, &cli.output_dir)?;
        return Ok(());
    }

    commands::message::run_message(bridge, &cli.message, cli.message_length())
}
