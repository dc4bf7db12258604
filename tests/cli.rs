//! Command-line tests for spitest, driven through the emulated bridge

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn spitest(bridge: &str) -> Command {
    let mut cmd = Command::cargo_bin("spitest").unwrap();
    cmd.arg("--bridge").arg(bridge);
    cmd
}

/// Write `count` 8-byte records, record `i` holding `i` big-endian
fn write_records(path: &Path, count: u64) {
    let text: String = (0..count).map(|i| format!("{:016x}\n", i)).collect();
    fs::write(path, text).unwrap();
}

#[test]
fn test_version() {
    Command::cargo_bin("spitest")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::starts_with("spitest Git version "))
        .stderr(predicate::str::contains("simplespi "));
}

#[cfg(feature = "ftdi")]
#[test]
fn test_version_lists_driver() {
    Command::cargo_bin("spitest")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stderr(predicate::str::is_match(r"(?m)^ftdi 0\.1\.\d+$").unwrap());
}

#[test]
fn test_verbose_enables_debug_log() {
    spitest("dummy")
        .env_remove("RUST_LOG")
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("Selecting SPI (GPIO 0x30)"));
}

#[test]
fn test_debug_log_is_off_by_default() {
    spitest("dummy")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Selecting SPI").not());
}

#[test]
fn test_default_message() {
    spitest("dummy")
        .assert()
        .success()
        .stdout("Select SPI\nGot 31323334 \"1234\"\n");
}

#[test]
fn test_message_tokens_are_joined_and_padded() {
    spitest("dummy")
        .args(["hel", "lo"])
        .assert()
        .success()
        .stdout("Select SPI\nGot 68656c6c \"hell\"\nGot 6f2e2e2e \"o...\"\n");
}

#[test]
fn test_length_message() {
    spitest("dummy")
        .args(["-l", "6", "ignored"])
        .assert()
        .success()
        .stdout("Select SPI\nGot 30313233 \"0123\"\nGot 34352e2e \"45..\"\n");
}

#[test]
fn test_jtag_exits_without_data() {
    spitest("dummy").arg("-j").assert().success().stdout("");
}

#[test]
fn test_flip() {
    let expected: String = (0..10).map(|_| "Select SPI\nSelect JTAG\n").collect();
    spitest("dummy").arg("-f").assert().success().stdout(expected);
}

#[test]
fn test_jtag_wins_over_flip() {
    spitest("dummy").args(["-j", "-f"]).assert().success().stdout("");
}

#[test]
fn test_receive_and_trim() {
    let tmp = TempDir::new().unwrap();
    let dump = tmp.path().join("dump.bin");
    let data: Vec<u8> = (0..1040u32).map(|i| i as u8).collect();
    fs::write(&dump, data).unwrap();

    spitest(&format!("dummy:readback={}", dump.display()))
        .args(["-r", "1024", "16", "--output-dir"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1040 bytes will be written to receive.txt\n"))
        .stdout(predicate::str::contains("read 1024 bytes\nread 16 bytes\n"));

    let raw = fs::read_to_string(tmp.path().join("receive.txt")).unwrap();
    assert_eq!(raw.lines().count(), 130);
    assert_eq!(raw.lines().next().unwrap(), "0706050403020100");

    let trimmed = fs::read_to_string(tmp.path().join("receive_trim.txt")).unwrap();
    let lines: Vec<&str> = trimmed.split('\n').collect();
    assert_eq!(lines.len(), 128);
    assert_eq!(lines[0], "0f0e0d0c0b0a0908");
    assert!(!trimmed.ends_with('\n'));
}

#[test]
fn test_send_with_echo() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("weights.txt");
    write_records(&input, 3 * 128);

    spitest("dummy")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening "))
        .stdout(predicate::str::contains("Patch 0 s[:8] 00000000 echo_match 01010101\n"))
        .stdout(predicate::str::contains("Patch 2 s[:8] 00000000 echo_match 01010101\n"))
        .stdout(predicate::str::contains("ERROR").not());
}

#[test]
fn test_send_echo_mismatch_is_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("weights.txt");
    write_records(&input, 3 * 128);

    spitest("dummy:echo=off")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Patch 1 "))
        .stdout(predicate::str::contains("Patch 2 ").not())
        .stdout(predicate::str::ends_with("ERROR: echo mismatch!\n"));
}

#[test]
fn test_send_rejects_bad_hex() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("bad.txt");
    fs::write(&input, "0011223344556677\nzz11223344556677\n").unwrap();

    spitest("dummy")
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line: 2"));
}

#[test]
fn test_unknown_bridge() {
    spitest("ch341a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bridge: ch341a"));
}

#[test]
fn test_receive_needs_two_counts() {
    spitest("dummy").args(["-r", "1024"]).assert().code(2);
}

#[test]
fn test_receive_size_overflow_is_an_error() {
    let tmp = TempDir::new().unwrap();

    spitest("dummy")
        .args(["-r", &u64::MAX.to_string(), "1", "--output-dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("receive size overflows"));

    assert!(!tmp.path().join("receive.txt").exists());
}
