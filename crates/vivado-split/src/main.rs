//! vivado-split - apply the DLA/FMC split to a generated Vivado project
//!
//! Usage: vivado-split <all|1..5> [--src-root DIR] [--build-root DIR]

use std::path::PathBuf;

use clap::Parser;
use vivado_split::{PatchDb, Roots, Selection};

#[derive(Parser)]
#[command(name = "vivado-split")]
#[command(version, about = "Patch generated Vivado sources for the DLA FMC split", long_about = None)]
struct Cli {
    /// Files to change: `all`, or a target number starting at 1
    selection: String,

    /// Root of the OpenTitan source tree
    #[arg(long, default_value = ".")]
    src_root: PathBuf,

    /// Root the generated outputs are relative to
    #[arg(long, default_value = ".")]
    build_root: PathBuf,

    /// Patch database to use instead of the built-in one
    #[arg(long)]
    patch_db: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    let db = match &cli.patch_db {
        Some(path) => PatchDb::load_file(path)?,
        None => PatchDb::builtin()?,
    };
    log::debug!("Loaded patch set {} ({} targets)", db.name, db.len());

    let selection = Selection::parse(&cli.selection, db.len());
    println!("{}", selection.announcement());

    let roots = Roots {
        src: cli.src_root,
        build: cli.build_root,
    };

    for index in selection.indices(db.len()) {
        let target = &db.targets[index];
        log::debug!("Target {}: {}", index + 1, target.description);
        target.run(&roots, |note| println!("{}", note))?;
    }

    Ok(())
}
