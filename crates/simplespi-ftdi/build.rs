//! Build script for simplespi-ftdi
//!
//! Exports the resolved version of the `ftdi` driver crate, taken from the
//! workspace `Cargo.lock`, as `SIMPLESPI_FTDI_DRIVER_VERSION`.

use std::env;
use std::fs;
use std::path::PathBuf;

const UNKNOWN: &str = "unknown";

fn find_lock_file() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
    manifest_dir
        .ancestors()
        .map(|dir| dir.join("Cargo.lock"))
        .find(|path| path.exists())
}

fn driver_version(lock: &str) -> Option<String> {
    let table: toml::Table = lock.parse().ok()?;
    table
        .get("package")?
        .as_array()?
        .iter()
        .filter_map(|pkg| pkg.as_table())
        .find(|pkg| pkg.get("name").and_then(|n| n.as_str()) == Some("ftdi"))
        .and_then(|pkg| pkg.get("version"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn main() {
    let version = match find_lock_file() {
        Some(path) => {
            println!("cargo::rerun-if-changed={}", path.display());
            fs::read_to_string(&path)
                .ok()
                .and_then(|lock| driver_version(&lock))
                .unwrap_or_else(|| UNKNOWN.to_string())
        }
        None => UNKNOWN.to_string(),
    };

    println!("cargo::rustc-env=SIMPLESPI_FTDI_DRIVER_VERSION={}", version);
    println!("cargo::rerun-if-changed=build.rs");
}
