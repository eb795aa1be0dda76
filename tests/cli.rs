use std::path::PathBuf;
use std::process::{Command, Output};

fn config_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "pref-calc-cli-{}-{}.json",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn pcalc(config: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pcalc"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("PCALC_LOG")
        .output()
        .unwrap()
}

#[test]
fn prints_result_on_stdout() {
    let output = pcalc(&config_path("ok"), &["2", "+", "2"]);
    assert!(output.status.success());
    assert_eq!("4.00\n", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn error_goes_to_stderr_with_failure_status() {
    let output = pcalc(&config_path("div-zero"), &["5", "/", "0"]);
    assert_eq!(Some(1), output.status.code());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Attempted to divide by zero"));
}

#[test]
fn precision_flag_overrides_settings_file() {
    let config = config_path("override");
    std::fs::write(&config, r#"{"Precision": 5}"#).unwrap();

    let output = pcalc(&config, &["1", "/", "3"]);
    assert_eq!("0.33333\n", String::from_utf8_lossy(&output.stdout));

    let output = pcalc(&config, &["--precision", "1", "1", "/", "3"]);
    assert_eq!("0.3\n", String::from_utf8_lossy(&output.stdout));
    std::fs::remove_file(config).ok();
}

#[test]
fn corrupt_settings_file_uses_defaults() {
    let config = config_path("corrupt");
    std::fs::write(&config, "not json").unwrap();

    let output = pcalc(&config, &["sqrt", "9"]);
    assert!(output.status.success());
    assert_eq!("3.00\n", String::from_utf8_lossy(&output.stdout));
    std::fs::remove_file(config).ok();
}

#[test]
fn oversized_precision_flag_is_rejected() {
    let output = pcalc(&config_path("oversized"), &["--precision", "70000", "1"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
