use std::fs;
use std::path::Path;

use assert_cmd::Command;

// Runs the binary with HOME pointed at a scratch directory so the log file
// and any default paths stay out of the real profile.
fn gti(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gti").unwrap();
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("XDG_STATE_HOME");
    cmd
}

fn write_config(dir: &Path, enabled: bool) -> std::path::PathBuf {
    let config = dir.join("config.json");
    let history = dir.join("history.jsonl");
    fs::write(
        &config,
        serde_json::json!({
            "history": { "enabled": enabled, "file": history.to_string_lossy() }
        })
        .to_string(),
    )
    .unwrap();
    config
}

#[test]
fn config_show_writes_defaults_on_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("profile").join("config.json");

    let output = gti(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "--show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(config.exists());
    assert!(stdout.contains("\"max_width\": 80"));
    assert!(stdout.contains("\"default_seconds\": 30"));
}

#[test]
fn bare_config_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = gti(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("--show"), "{stdout}");
    assert!(stdout.contains("--reset"), "{stdout}");
    assert!(!stdout.contains("max_width"), "{stdout}");
}

#[test]
fn stats_summarizes_history() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), true);
    let line = r#"{"timestamp":"2024-01-01T12:00:00+00:00","mode":"quote","text_length":40,"duration_ms":20000,"wpm":48.0,"net_wpm":45.0,"accuracy":98.0}"#;
    fs::write(
        dir.path().join("history.jsonl"),
        format!("{line}\nnot json\n{line}\n"),
    )
    .unwrap();

    let output = gti(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("stats")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("Sessions:        2"), "{stdout}");
    assert!(stdout.contains("Best net wpm:    45.0"), "{stdout}");
    assert!(stdout.contains("Challenge level: 0"), "{stdout}");
}

#[test]
fn stats_reports_disabled_history() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    let output = gti(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("stats")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "History tracking is disabled.\n"
    );
}

#[test]
fn interactive_mode_requires_a_tty() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), true);

    gti(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["quote", "-p", "hi"])
        .write_stdin("hi")
        .assert()
        .failure();
}

#[test]
fn unsupported_language_is_reported_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), false);

    // no tty, so the run stops right after choosing the word list
    let output = gti(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["words", "-l", "klingon"])
        .write_stdin("")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();

    assert!(
        stderr.contains("unsupported language \"klingon\""),
        "{stderr}"
    );
}
