//! End-to-end tests for the `glean` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const GRAPH_RESPONSE: &str = "(\"entity\"<|>APPLE INC<|>ORGANIZATION<|>A technology company)\n##\n\
(\"entity\"<|>STEVE JOBS<|>PERSON<|>Co-founder of Apple)\n##\n\
(\"relationship\"<|>STEVE JOBS<|>APPLE INC<|>Founded the company<|>9)\n<|COMPLETE|>";

fn glean(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glean"))
        .arg("--config")
        .arg(config)
        .arg("--no-color")
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("GLEAN_MODEL")
        .output()
        .expect("failed to run glean")
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn parse_graph_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let response = dir.path().join("response.txt");
    fs::write(&response, GRAPH_RESPONSE).unwrap();

    let output = glean(&config, &["--format", "json", "parse", "graph", "--file", response.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["entities"].as_array().unwrap().len(), 2);
    assert_eq!(value["entities"][1]["name"], "STEVE JOBS");
    assert_eq!(value["relationships"][0]["weight"], 9.0);
}

#[test]
fn parse_claims_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let response = dir.path().join("claims.txt");
    fs::write(
        &response,
        "(COMPANY A<|>GOVERNMENT AGENCY B<|>ANTI-COMPETITIVE PRACTICES<|>TRUE<|>2022-01-10T00:00:00<|>2022-01-10T00:00:00<|>Company A was fined<|>Company A was fined for bid rigging)<|COMPLETE|>",
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    let output = glean(
        &config,
        &[
            "parse",
            "claims",
            "--file",
            response.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = fs::read_to_string(out_dir.join("claims.csv")).unwrap();
    assert!(csv.starts_with("subject,object,type,status"));
    assert!(csv.contains("COMPANY A,GOVERNMENT AGENCY B,ANTI-COMPETITIVE PRACTICES,TRUE"));
}

#[test]
fn parse_uses_configured_delimiters() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[parsing]\nrecord_delimiter = \"\\n\"\ntuple_delimiter = \"|\"\ncompletion_marker = \"END\"\n",
    );
    let response = dir.path().join("response.txt");
    fs::write(&response, "entity|ACME|ORGANIZATION|A company\nEND\nentity|LATE|PERSON|ignored").unwrap();

    let output = glean(&config, &["--format", "json", "parse", "graph", "--file", response.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["entities"].as_array().unwrap().len(), 1);
}

#[test]
fn prompt_includes_input_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[extract_graph]\nentity_types = [\"person\", \"ship\"]\n");
    let input = dir.path().join("input.txt");
    fs::write(&input, "Captain Ahab commanded the Pequod.").unwrap();

    let output = glean(&config, &["prompt", "graph", "--file", input.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Entity_types: PERSON,SHIP"));
    assert!(stdout.contains("Captain Ahab commanded the Pequod."));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[extract_graph]\nentity_types = []\n");
    let input = dir.path().join("input.txt");
    fs::write(&input, "text").unwrap();

    let output = glean(&config, &["prompt", "graph", "--file", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("[extract_graph]"));
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    let output = glean(&config, &["parse", "graph"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--file or --stdin"));
}

#[test]
fn config_init_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let output = glean(&path, &["config", "init"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(path.exists());

    let again = glean(&path, &["config", "init"]);
    assert!(!again.status.success());

    let shown = glean(&path, &["config", "show"]);
    assert!(shown.status.success());
    let stdout = String::from_utf8_lossy(&shown.stdout);
    assert!(stdout.contains("[extract_graph]"));
    assert!(stdout.contains("max_gleanings = 1"));
}

#[test]
fn extract_without_api_key_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[llm]\nmodel = \"claude-sonnet-4-5\"\n");
    let input = dir.path().join("input.txt");
    fs::write(&input, "text").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_glean"))
        .args(["--config", config.to_str().unwrap(), "extract", "--file", input.to_str().unwrap()])
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("GLEAN_MODEL")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ANTHROPIC_API_KEY"));
}
