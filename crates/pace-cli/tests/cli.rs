use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn pace() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pace"));
    for (key, _) in std::env::vars().filter(|(key, _)| key.starts_with("PACE_")) {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_empty_stdin_exits_cleanly() {
    let output = pace().stdin(Stdio::null()).output().unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_verbose_is_silent_on_empty_input() {
    let output = pace().arg("-v").stdin(Stdio::null()).output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Pace is"), "stderr: {}", stderr);
}

#[test]
fn test_paces_stdin_to_stdout() {
    let mut child = pace()
        .args(["-n", "1000000", "-v", "--timer", "deadline"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let start = Instant::now();
    child.stdin.take().unwrap().write_all(b"ABCDE").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, b"ABCDE");
    assert!(start.elapsed() >= Duration::from_millis(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Pace is 1000000nS per byte"), "stderr: {}", stderr);
}

#[test]
fn test_paces_file_argument() {
    let path = std::env::temp_dir().join(format!("pace-cli-input-{}.bin", std::process::id()));
    let data: Vec<u8> = (0..=255u8).collect();
    fs::write(&path, &data).unwrap();

    let output = pace().args(["-b", "100000", "-s", "64"]).arg(&path).output().unwrap();
    fs::remove_file(&path).unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, data);
}

#[test]
fn test_long_run_after_newline_is_written_whole() {
    let path = std::env::temp_dir().join(format!("pace-cli-lines-{}.txt", std::process::id()));
    let mut data = b"A\n".to_vec();
    data.extend(std::iter::repeat(b'x').take(3000));
    fs::write(&path, &data).unwrap();

    // At 1nS per byte the credit covers the whole file in one run
    let output = pace().args(["-n", "1"]).arg(&path).output().unwrap();
    fs::remove_file(&path).unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, data);
    assert!(output.stderr.is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_failure_is_one_line() {
    let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
    let mut child = pace()
        .args(["-n", "1000"])
        .stdin(Stdio::piped())
        .stdout(full)
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child.stdin.take().unwrap().write_all(b"hello\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim_end().lines().count(), 1, "stderr: {}", stderr);
    assert!(stderr.starts_with("Output write failed:"), "stderr: {}", stderr);
}

#[test]
fn test_missing_file_fails() {
    let output = pace().arg("/nonexistent/pace-input").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Can't open /nonexistent/pace-input:"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_pace_fails() {
    for args in [["-b", "10"], ["-n", "0"], ["-b", "abc"]] {
        let output = pace().args(args).stdin(Stdio::null()).output().unwrap();
        assert_eq!(output.status.code(), Some(1), "args {:?}", args);
    }
}

#[test]
fn test_conflicting_flags_fail() {
    let output = pace().args(["-b", "9600", "-n", "1000"]).stdin(Stdio::null()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_succeeds() {
    let output = pace().arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
