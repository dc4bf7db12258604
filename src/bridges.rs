//! Bridge registration and opening
//!
//! A bridge is selected with `--bridge <name>[:key=value,...]`, for example
//! `ftdi:type=2232h,port=A` or `dummy:echo=off`.

use simplespi_core::SpiBridge;

/// Information about a bridge backend
pub struct BridgeInfo {
    /// Name used on the command line
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Bridge backends enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_bridges() -> Vec<BridgeInfo> {
    let mut bridges = Vec::new();

    #[cfg(feature = "ftdi")]
    bridges.push(BridgeInfo {
        name: "ftdi",
        description: "FTDI MPSSE bridge (FT2232H/FT4232H/FT232H) (type=<dev>,port=<A-D>,divisor=<N>)",
    });

    #[cfg(feature = "dummy")]
    bridges.push(BridgeInfo {
        name: "dummy",
        description: "Emulated bridge and device (echo=<on|off>,lag=<N>,readback=<file>)",
    });

    bridges
}

/// Generate help text listing the available bridges
pub fn bridge_help() -> String {
    let bridges = available_bridges();

    if bridges.is_empty() {
        return "No bridges available (recompile with a bridge feature enabled)".to_string();
    }

    let mut help = String::from("Available bridges:\n");
    for b in &bridges {
        help.push_str(&format!("  {:8} - {}\n", b.name, b.description));
    }
    help
}

/// Split `name:options` into the name and the raw option string
pub fn parse_bridge_string(s: &str) -> (&str, &str) {
    s.split_once(':').unwrap_or((s, ""))
}

/// Open the bridge described by `spec`
#[allow(unused_variables)]
pub fn open_bridge(spec: &str) -> Result<Box<dyn SpiBridge>, Box<dyn std::error::Error>> {
    let (name, options) = parse_bridge_string(spec);

    match name {
        #[cfg(feature = "ftdi")]
        "ftdi" => {
            log::info!("Opening FTDI bridge...");
            let bridge = simplespi_ftdi::open(options).map_err(|e| {
                format!(
                    "Failed to open FTDI bridge: {}\nMake sure the device is connected and you have permissions.",
                    e
                )
            })?;
            Ok(Box::new(bridge))
        }

        #[cfg(feature = "dummy")]
        "dummy" => Ok(Box::new(open_dummy(options)?)),

        _ => Err(format!("Unknown bridge: {}\n\n{}", name, bridge_help()).into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(options: &str) -> Result<simplespi_dummy::DummyBridge, Box<dyn std::error::Error>> {
    use simplespi_dummy::{DummyBridge, DummyConfig};

    let mut config = DummyConfig::default();
    for opt in options.split(',').filter(|o| !o.is_empty()) {
        let (key, value) = opt.split_once('=').unwrap_or((opt, ""));
        match key {
            "echo" => {
                config.echo_patches = match value {
                    "on" | "1" | "" => true,
                    "off" | "0" => false,
                    _ => return Err(format!("Invalid echo value: {}", value).into()),
                }
            }
            "lag" => {
                config.echo_lag = value
                    .parse()
                    .map_err(|e| format!("Invalid lag '{}': {}", value, e))?;
            }
            "readback" => {
                config.readback = std::fs::read(value)
                    .map_err(|e| format!("Failed to read {}: {}", value, e))?;
            }
            _ => log::warn!("Ignoring unknown dummy option: {}", key),
        }
    }

    log::info!("Using emulated bridge");
    Ok(DummyBridge::new(config))
}
