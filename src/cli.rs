//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Bridge used when `--bridge` is not given
pub const DEFAULT_BRIDGE: &str = "ftdi:type=2232h,port=A,divisor=60";

#[derive(Parser)]
#[command(name = "spitest")]
#[command(
    author,
    about = "Simple tool for FPGA SPI experiments",
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
    /// Show version and exit
    #[arg(long)]
    pub version: bool,

    /// Verbose output during processing (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Flip the SPI/JTAG control GPIO 10 times and exit
    #[arg(short, long)]
    pub flippy: bool,

    /// Construct and send a message of specified length
    #[arg(short, long, value_name = "N")]
    pub length: Option<usize>,

    /// Set SPI/JTAG control to JTAG and exit
    #[arg(short, long)]
    pub jtag: bool,

    /// Message to send in 4 byte chunks
    #[arg(value_name = "INPUT", default_value = "1234")]
    pub message: Vec<String>,

    /// Send the hex records of a file, one per line
    #[arg(short, long, value_name = "/path/file.txt")]
    pub input: Option<PathBuf>,

    /// Receive PAYLOAD + EXTRA bytes and keep the PAYLOAD part
    #[arg(short, long, num_args = 2, value_names = ["PAYLOAD", "EXTRA"])]
    pub receive: Option<Vec<usize>>,

    /// Bridge to use: <name>[:key=value,...]
    #[arg(long, default_value = DEFAULT_BRIDGE)]
    pub bridge: String,

    /// Directory for receive.txt and receive_trim.txt
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Cli {
    /// Payload and extra byte counts of `--receive`
    pub fn receive_counts(&self) -> Option<(usize, usize)> {
        match self.receive.as_deref() {
            Some([payload, extra]) => Some((*payload, *extra)),
            _ => None,
        }
    }

    /// Requested synthesised message length, if any
    pub fn message_length(&self) -> Option<usize> {
        self.length.filter(|&n| n > 0)
    }
}
