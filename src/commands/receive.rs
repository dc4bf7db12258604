//! Receive command
//!
//! Clocks a memory dump out of the device into `receive.txt`, then cuts the
//! payload out of it into `receive_trim.txt`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use simplespi_core::protocol::receive::{
    capture, trim_capture, TrimWindow, RAW_CAPTURE_FILE, TRIMMED_CAPTURE_FILE,
};
use simplespi_core::SpiBridge;

use super::create_progress_bar_style;

/// Receive `payload + extra` bytes and trim the capture down to `payload`
///
/// Returns the paths of the raw and trimmed captures.
pub fn run_receive(
    bridge: &mut dyn SpiBridge,
    payload: usize,
    extra: usize,
    output_dir: &Path,
) -> Result<(PathBuf, PathBuf), Box<dyn std::error::Error>> {
    let total = payload
        .checked_add(extra)
        .ok_or("receive size overflows")?;
    let raw_path = output_dir.join(RAW_CAPTURE_FILE);
    let trim_path = output_dir.join(TRIMMED_CAPTURE_FILE);

    println!("{} bytes will be written to {}", total, RAW_CAPTURE_FILE);
    let file = File::create(&raw_path)
        .map_err(|e| format!("Failed to create {}: {}", raw_path.display(), e))?;
    let mut writer = BufWriter::new(file);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(create_progress_bar_style("bytes")?);

    let lines = capture(bridge, total, &mut writer, |chunk| {
        pb.suspend(|| println!("read {} bytes", chunk));
        pb.inc(chunk as u64);
    })?;
    drop(writer);
    pb.finish_with_message("Receive complete");
    log::info!("Captured {} lines to {}", lines, raw_path.display());

    println!("{} bytes will be written to {}", payload, TRIMMED_CAPTURE_FILE);
    let raw = fs::read_to_string(&raw_path)?;
    let window = TrimWindow::for_payload(payload);
    log::debug!("Keeping lines {}..{}", window.head, window.tail);
    fs::write(&trim_path, trim_capture(&raw, window))?;

    Ok((raw_path, trim_path))
}
