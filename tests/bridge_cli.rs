//! End-to-end tests driving the compiled binary over stdin/stdout.

use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const STORY: &str = r#"
defs:
  intro:
    text:
      - "Once upon a time, ${ hero } "
      - "lived in ${ place }."
"#;

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("prompts")).unwrap();
    std::fs::write(temp_dir.path().join("prompts/story-prompts.pdl"), STORY).unwrap();
    temp_dir
}

fn run_bridge(root: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pdl-bridge"))
        .args(args)
        .arg("--project-root")
        .arg(root)
        .env_remove("PDL_BRIDGE_CONFIG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn pdl-bridge");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn response(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert!(stdout.ends_with('\n'), "stdout: {:?}", stdout);
    serde_json::from_str(stdout.trim_end()).unwrap()
}

#[test]
fn success_exits_zero_with_content() {
    let project = project();
    let output = run_bridge(
        project.path(),
        &[],
        r#"{"template": "intro", "variables": {"place": "Lisbon", "hero": "a fox"}}"#,
    );

    assert_eq!(output.status.code(), Some(0));
    let json = response(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["content"], "Once upon a time, a fox lived in Lisbon.");
    assert_eq!(json["variables_used"], serde_json::json!(["place", "hero"]));
}

#[test]
fn missing_file_exits_one() {
    let project = project();
    let output = run_bridge(
        project.path(),
        &["render"],
        r#"{"pdl_file": "prompts/missing.pdl", "template": "intro"}"#,
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(response(&output)["error_type"], "file_not_found");
}

#[test]
fn invalid_yaml_exits_one() {
    let project = project();
    std::fs::write(project.path().join("bad.pdl"), "defs: {intro: [\n").unwrap();
    let output = run_bridge(
        project.path(),
        &[],
        r#"{"pdl_file": "bad.pdl", "template": "intro"}"#,
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(response(&output)["error_type"], "yaml_error");
}

#[test]
fn unknown_template_exits_one() {
    let project = project();
    let output = run_bridge(project.path(), &[], r#"{"template": "outro"}"#);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(response(&output)["error_type"], "template_not_found");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let project = project();
    let request = r#"{"template": "intro", "variables": {"hero": "Ada", "place": "Turin"}}"#;

    let first = run_bridge(project.path(), &[], request);
    let second = run_bridge(project.path(), &[], request);

    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn serve_mode_answers_every_line() {
    let project = project();
    let input = concat!(
        "{\"template\": \"intro\", \"variables\": {\"hero\": \"A\", \"place\": \"B\"}}\n",
        "{\"template\": \"outro\"}\n",
    );
    let output = run_bridge(project.path(), &["serve"], input);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["success"], true);
    assert_eq!(lines[1]["error_type"], "template_not_found");
}
