//! `--version` output

use std::io::Write;

/// `git describe` of the checkout this binary was built from
pub const GIT_VERSION: &str = env!("SPITEST_GIT_VERSION");

/// Components reported next to the Git version
pub fn components() -> Vec<(&'static str, &'static str)> {
    let mut list = vec![("simplespi", env!("CARGO_PKG_VERSION"))];
    #[cfg(feature = "ftdi")]
    list.push(("ftdi", simplespi_ftdi::DRIVER_VERSION));
    list
}

/// Write the version report
pub fn write_report<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "spitest Git version {}", GIT_VERSION)?;
    for (name, version) in components() {
        writeln!(out, "{} {}", name, version)?;
    }
    Ok(())
}

/// Print the version report to stderr and exit successfully
pub fn show_and_exit() -> ! {
    let _ = write_report(&mut std::io::stderr());
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let mut out = Vec::new();
        write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("spitest Git version "));
        assert_eq!(
            lines.next().unwrap(),
            format!("simplespi {}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[cfg(feature = "ftdi")]
    #[test]
    fn test_report_lists_driver() {
        let mut out = Vec::new();
        write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let driver = text.lines().find(|l| l.starts_with("ftdi ")).unwrap();
        assert_eq!(driver, format!("ftdi {}", simplespi_ftdi::DRIVER_VERSION));
        assert!(driver.starts_with("ftdi 0.1."));
    }
}
