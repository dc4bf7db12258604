//! Build script for spitest
//!
//! Records `git describe` of the checkout for `spitest --version`.

use std::path::Path;
use std::process::Command;

const NOT_FOUND: &str = "not found (not in Git repository?)";

fn main() {
    let describe = Command::new("git")
        .args(["describe", "--always", "--dirty", "--broken"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|ver| !ver.is_empty())
        .unwrap_or_else(|| NOT_FOUND.to_string());

    println!("cargo::rustc-env=SPITEST_GIT_VERSION={}", describe);

    // Re-describe when HEAD moves or the index changes
    for file in [".git/HEAD", ".git/index"] {
        if Path::new(file).exists() {
            println!("cargo::rerun-if-changed={}", file);
        }
    }
    println!("cargo::rerun-if-changed=build.rs");
}
