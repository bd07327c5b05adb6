//! Integration tests running the querylens binary.
//!
//! Each run gets an empty config directory so a user's `config.json` and
//! `QUERYLENS_*` variables cannot leak into the results.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn querylens(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_querylens"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("APPDATA", home.path())
        .env("LOCALAPPDATA", home.path())
        .env_remove("QUERYLENS_COMMENTS")
        .env_remove("QUERYLENS_PATTERN_TYPE")
        .env_remove("QUERYLENS_DECORATE")
        .env_remove("QUERYLENS_LOG")
        .output()
        .expect("Failed to run querylens")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_parse_prints_sexpr() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["parse", "repo:foo a or b and c"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "(or repo:foo a (and b c))\n");
}

#[test]
fn test_parse_error_exits_nonzero() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["parse", "NOT -repo:foo"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no double negation"));
}

#[test]
fn test_scan_error_points_at_offset() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["scan", "foo \"bar"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("closing quote"));
    assert!(err.contains('^'));
}

#[test]
fn test_scan_json() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["scan", "--json", "lang:go x"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let members = json["members"].as_array().unwrap();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0]["type"], "filter");
    assert_eq!(members[2]["type"], "pattern");
}

#[test]
fn test_tokens_with_pattern_type() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["tokens", "--pattern-type", "regexp", "a+"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("metaRegexpQuantifier"));

    let output = querylens(&home, &["tokens", "--pattern-type", "regexp", "--no-decorate", "a+"]);
    assert!(!stdout(&output).contains("metaRegexp"));
}

#[test]
fn test_hover_column() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["hover", "-repo:foo", "--column", "2"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Exclude results from repositories"));

    let output = querylens(&home, &["hover", "foo", "--column", "2"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_highlight_without_color_echoes_query() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["highlight", "--color", "never", "repo:a (b or c)"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "repo:a (b or c)\n");
}

#[test]
fn test_config_file_and_env() {
    let home = TempDir::new().unwrap();
    let output = querylens(&home, &["config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let path = text.lines().next().unwrap().trim_start_matches("# ").to_string();
    assert!(path.ends_with("config.json"));

    fs::create_dir_all(std::path::Path::new(&path).parent().unwrap()).unwrap();
    fs::write(&path, r#"{ "interpret_comments": true }"#).unwrap();

    let output = querylens(&home, &["parse", "foo // comment"]);
    assert_eq!(stdout(&output), "foo\n");

    let output = Command::new(env!("CARGO_BIN_EXE_querylens"))
        .args(["parse", "foo // comment"])
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("APPDATA", home.path())
        .env("LOCALAPPDATA", home.path())
        .env("QUERYLENS_COMMENTS", "false")
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "foo\n//\ncomment\n");
}
