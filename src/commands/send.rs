//! File-send command
//!
//! Uploads a file of hex records, one exchange per record, and checks every
//! patch through the echo the device returns during the following patch.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indicatif::ProgressBar;
use simplespi_core::protocol::echo::{send_records, SendEvent, ECHO_WORD};
use simplespi_core::protocol::record::{load_records, to_hex};
use simplespi_core::{Error, SpiBridge};

use super::create_progress_bar_style;

/// What an upload ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Every checked patch was acknowledged
    Complete {
        /// Records sent
        records: usize,
    },
    /// A patch was never acknowledged and the upload stopped
    EchoMismatch {
        /// The patch that was lost
        patch: usize,
    },
}

/// Send the records of `path`
///
/// An echo mismatch is reported on stdout and ends the upload without
/// failing the command.
pub fn run_send(
    bridge: &mut dyn SpiBridge,
    path: &Path,
) -> Result<SendOutcome, Box<dyn std::error::Error>> {
    println!("Opening {}", path.display());
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let records = load_records(BufReader::new(file))?;
    log::info!("Loaded {} records", records.len());

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(create_progress_bar_style("records")?);

    let result = send_records(bridge, &records, |event| match event {
        SendEvent::Exchanged { index, read } => {
            log::trace!("{} Got {}", index, to_hex(read));
            pb.inc(1);
        }
        SendEvent::PatchQueued { header, queued } => {
            let head = to_hex(&header[..header.len().min(ECHO_WORD)]);
            pb.suspend(|| {
                println!(
                    "Patch {} s[:8] {} echo_match {}",
                    queued.patch,
                    head,
                    to_hex(&queued.echo[..ECHO_WORD])
                )
            });
        }
        SendEvent::Acknowledged { patch } => {
            log::debug!("Patch {} acknowledged", patch);
        }
    });

    match result {
        Ok(sent) => {
            pb.finish_with_message("Send complete");
            log::info!("Sent {} records", sent);
            Ok(SendOutcome::Complete { records: sent })
        }
        Err(Error::EchoMismatch { patch, expected }) => {
            pb.abandon();
            log::error!("Patch {} never echoed {}", patch, expected);
            println!("ERROR: echo mismatch!");
            Ok(SendOutcome::EchoMismatch { patch })
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}
