//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` to assert effective values, and `analyze --json` to check
//! that configured defaults reach the pipeline.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    for var in [
        "NEWSGRAPH_NAVER__CLIENT_ID",
        "NEWSGRAPH_NAVER__CLIENT_SECRET",
        "NEWSGRAPH_MIN_TERM_LENGTH",
        "NEWSGRAPH_WEEKDAY_LOCALE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &std::path::Path) -> Value {
    json_output(cmd().args(["-C", dir.to_str().unwrap(), "info", "--json"]))
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert!(json["config"]["config_file"].is_null());
    assert_eq!(json["config"]["analysis"]["document_limit"], 1000);
    assert_eq!(json["config"]["analysis"]["wordcloud_top_n"], 80);
    assert_eq!(json["config"]["analysis"]["time_series_top_n"], 5);
    assert_eq!(json["config"]["weekday_locale"], "ko");
    assert_eq!(json["config"]["naver_credentials"], false);
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "edge_top_n = 25\n").unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["analysis"]["edge_top_n"], 25);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".newsgraph.toml"), "should report dotfile: {reported}");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("newsgraph.toml"), "min_term_length = 3\n").unwrap();

    let json = info_json(&sub_dir);
    assert_eq!(json["config"]["analysis"]["min_term_length"], 3);
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "min_term_length = 1\nedge_top_n = 30\n").unwrap();
    fs::write(tmp.path().join("newsgraph.toml"), "min_term_length = 4\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["analysis"]["min_term_length"], 4);
    assert_eq!(json["config"]["analysis"]["edge_top_n"], 30, "dotfile keys still merge");
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".newsgraph.yaml"),
        "weekday_locale: en\nutc_offset_minutes: 0\nnaver:\n  client_id: id\n  client_secret: secret\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["weekday_locale"], "en");
    assert_eq!(json["config"]["utc_offset_minutes"], 0);
    assert_eq!(json["config"]["naver_credentials"], true);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".newsgraph.json"),
        r#"{"log_level": "error", "extra_stopwords": ["기자", "사진"]}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "error");
    assert_eq!(json["config"]["extra_stopwords"], 2);
}

// =============================================================================
// Config Precedence
// =============================================================================

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("project");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "edge_top_n = 10\n").unwrap();
    fs::write(sub_dir.join(".newsgraph.toml"), "edge_top_n = 90\n").unwrap();

    let json = info_json(&sub_dir);
    assert_eq!(json["config"]["analysis"]["edge_top_n"], 90);
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "wordcloud_top_n = 40\n").unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "wordcloud_top_n = 120\n").unwrap();

    let json = json_output(cmd().args([
        "-C",
        tmp.path().to_str().unwrap(),
        "--config",
        explicit.to_str().unwrap(),
        "info",
        "--json",
    ]));

    assert_eq!(json["config"]["analysis"]["wordcloud_top_n"], 120);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.toml"), "--config path should be reported: {reported}");
}

#[test]
fn env_var_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("newsgraph.toml"), "min_term_length = 3\n").unwrap();

    let json = json_output(
        cmd()
            .env("NEWSGRAPH_MIN_TERM_LENGTH", "1")
            .env("NEWSGRAPH_NAVER__CLIENT_ID", "id")
            .env("NEWSGRAPH_NAVER__CLIENT_SECRET", "secret")
            .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"]),
    );
    assert_eq!(json["config"]["analysis"]["min_term_length"], 1);
    assert_eq!(json["config"]["naver_credentials"], true);
}

#[test]
fn configured_defaults_reach_the_pipeline() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("corpus.json"),
        r#"[{"published_at": "2025-07-01T09:00:00+09:00", "title": "케이팝 데몬 헌터스 애니메이션"}]"#,
    )
    .unwrap();
    fs::write(
        tmp.path().join("newsgraph.toml"),
        "edge_top_n = 2\nweekday_locale = \"en\"\nextra_stopwords = [\"데몬\"]\n",
    )
    .unwrap();

    let json = json_output(cmd().current_dir(tmp.path()).args([
        "analyze",
        "넷플릭스",
        "--input",
        "corpus.json",
        "--json",
    ]));
    assert_eq!(json["graph"]["edges"].as_array().unwrap().len(), 2);
    assert_eq!(json["time_series"]["volume"][0]["weekday"], "Tuesday");
    assert_eq!(json["distinct_terms"], 3);
}

#[test]
fn extra_nouns_from_config_stay_whole() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("corpus.json"),
        r#"[{"published_at": "2025-07-01T09:00:00+09:00", "title": "거북이 고양이 애니메이션"}]"#,
    )
    .unwrap();
    fs::write(tmp.path().join("newsgraph.toml"), "extra_nouns = [\"거북이\"]\n").unwrap();

    let json = json_output(cmd().current_dir(tmp.path()).args([
        "analyze",
        "넷플릭스",
        "--input",
        "corpus.json",
        "--json",
    ]));
    let terms: Vec<&str> = json["top_terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["term"].as_str().unwrap())
        .collect();
    assert_eq!(terms, vec!["거북이", "고양이", "애니메이션"]);
    assert_eq!(info_json(tmp.path())["config"]["extra_nouns"], 1);
}

#[test]
fn stopwords_file_from_config_is_used() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("corpus.json"),
        r#"[{"published_at": "2025-07-01T09:00:00+09:00", "title": "케이팝 애니메이션 영화"}]"#,
    )
    .unwrap();
    fs::write(tmp.path().join("stop.txt"), "# custom\n영화\n").unwrap();
    fs::write(tmp.path().join("newsgraph.toml"), "stopwords_file = \"stop.txt\"\n").unwrap();

    let json = json_output(cmd().current_dir(tmp.path()).args([
        "analyze",
        "넷플릭스",
        "--input",
        "corpus.json",
        "--json",
    ]));
    let terms: Vec<&str> = json["top_terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["term"].as_str().unwrap())
        .collect();
    assert_eq!(terms, vec!["케이팝", "애니메이션"]);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "this is not valid toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_locale_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".newsgraph.toml"), "weekday_locale = \"fr\"\n").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".newsgraph.toml"),
        "log_level = \"warn\"\nunknown_field = \"should be ignored\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "warn");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(parent.join(".newsgraph.toml"), "edge_top_n = 10\n").unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);
    assert_eq!(json["config"]["analysis"]["edge_top_n"], 50);
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".newsgraph.toml"), "edge_top_n = 10\n").unwrap();

    let json = info_json(&src);
    assert_eq!(json["config"]["analysis"]["edge_top_n"], 10);
}
