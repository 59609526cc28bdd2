//! Tests for the bridge request handler.

use super::Bridge;
use crate::config::{BridgeConfig, EngineKind};
use crate::engine::{BuiltinEngine, EngineError, Invocation, TemplateEngine};
use crate::protocol::BridgeResponse;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STORY: &str = r#"
description: Story prompts
defs:
  intro:
    text:
      - "Once upon a time, ${ hero } "
      - "lived in ${ place }."
  title: "A tale of ${ hero }"
  generate:
    text:
      - model: ollama/granite3.2
"#;

/// Engine that reports what it was given instead of rendering.
struct EchoEngine;

impl TemplateEngine for EchoEngine {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(&self, invocation: &Invocation<'_>) -> Result<String, EngineError> {
        let names: Vec<&str> = invocation.variables.keys().map(String::as_str).collect();
        Ok(format!("{}:{}", invocation.template, names.join(",")))
    }
}

struct FailingEngine;

impl TemplateEngine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn execute(&self, _invocation: &Invocation<'_>) -> Result<String, EngineError> {
        Err(EngineError::Failed {
            code: Some(1),
            stderr: "rate limited".to_string(),
        })
    }
}

fn project_with_story() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let prompts = temp_dir.path().join("prompts");
    std::fs::create_dir_all(&prompts).unwrap();
    std::fs::write(prompts.join("story-prompts.pdl"), STORY).unwrap();
    temp_dir
}

fn bridge(root: &Path, engine: Box<dyn TemplateEngine>) -> Bridge {
    Bridge::new(
        root.to_path_buf(),
        PathBuf::from("./prompts/story-prompts.pdl"),
        engine,
    )
}

fn to_json(response: &BridgeResponse) -> Value {
    serde_json::to_value(response).unwrap()
}

#[test]
fn test_renders_default_document() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(
        r#"{"template": "intro", "variables": {"hero": "a fox", "place": "Lisbon"}}"#,
    );

    assert!(response.is_success());
    assert_eq!(
        to_json(&response),
        json!({
            "success": true,
            "content": "Once upon a time, a fox lived in Lisbon.",
            "template": "intro",
            "variables_used": ["hero", "place"]
        })
    );
}

#[test]
fn test_variables_used_reports_supplied_not_consumed() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(
        r#"{"template": "title", "variables": {"unused": 1, "hero": "Ada", "extra": null}}"#,
    );

    let json = to_json(&response);
    assert_eq!(json["content"], "A tale of Ada");
    assert_eq!(json["variables_used"], json!(["unused", "hero", "extra"]));
}

#[test]
fn test_absolute_pdl_file_is_used_verbatim() {
    let project = project_with_story();
    let elsewhere = TempDir::new().unwrap();
    let path = elsewhere.path().join("other.pdl");
    std::fs::write(&path, "defs:\n  hello: \"hi ${ name }\"\n").unwrap();

    let bridge = bridge(project.path(), Box::new(BuiltinEngine));
    let request = json!({
        "pdl_file": path.display().to_string(),
        "template": "hello",
        "variables": {"name": "Bo"}
    });
    let response = bridge.handle(&request.to_string());

    assert_eq!(to_json(&response)["content"], "hi Bo");
}

#[test]
fn test_relative_pdl_file_resolves_against_root() {
    let project = project_with_story();
    std::fs::write(project.path().join("local.pdl"), "defs:\n  t: plain\n").unwrap();

    let bridge = bridge(project.path(), Box::new(BuiltinEngine));
    let response = bridge.handle(r#"{"pdl_file": "local.pdl", "template": "t"}"#);

    assert_eq!(to_json(&response)["content"], "plain");
    assert_eq!(to_json(&response)["variables_used"], json!([]));
}

#[test]
fn test_missing_file_is_file_not_found() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(r#"{"pdl_file": "nope.pdl", "template": "intro"}"#);

    assert!(!response.is_success());
    let json = to_json(&response);
    assert_eq!(json["success"], false);
    assert_eq!(json["error_type"], "file_not_found");
    assert!(json["error"].as_str().unwrap().contains("nope.pdl"));
}

#[test]
fn test_invalid_yaml_is_yaml_error() {
    let project = project_with_story();
    std::fs::write(project.path().join("broken.pdl"), "defs:\n  a: [\n").unwrap();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(r#"{"pdl_file": "broken.pdl", "template": "a"}"#);

    assert_eq!(to_json(&response)["error_type"], "yaml_error");
}

#[test]
fn test_unknown_template_is_template_not_found() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(r#"{"template": "epilogue"}"#);

    let json = to_json(&response);
    assert_eq!(json["error_type"], "template_not_found");
    assert_eq!(
        json["error"],
        "Template 'epilogue' not found in PDL configuration"
    );
}

#[test]
fn test_missing_template_field() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(r#"{"variables": {"hero": "x"}}"#);

    assert_eq!(to_json(&response)["error_type"], "missing_field");
}

#[test]
fn test_malformed_request_is_invalid_request() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle("{\"template\": ");

    assert_eq!(to_json(&response)["error_type"], "invalid_request");
}

#[test]
fn test_engine_failure_is_ai_error() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(FailingEngine));

    let response = bridge.handle(r#"{"template": "intro"}"#);

    let json = to_json(&response);
    assert_eq!(json["error_type"], "ai_error");
    assert_eq!(
        json["error"],
        "AI generation error: engine command failed with exit code 1: rate limited"
    );
}

#[test]
fn test_builtin_refuses_model_blocks() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.handle(r#"{"template": "generate"}"#);

    assert_eq!(to_json(&response)["error_type"], "ai_error");
}

#[test]
fn test_engine_receives_template_and_variables() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(EchoEngine));

    let response = bridge.handle(r#"{"template": "generate", "variables": {"b": 1, "a": 2}}"#);

    assert_eq!(to_json(&response)["content"], "generate:b,a");
}

#[test]
fn test_identical_requests_render_identically() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));
    let request = r#"{"template": "intro", "variables": {"hero": "Ada", "place": "Turin"}}"#;

    let first = serde_json::to_string(&bridge.handle(request)).unwrap();
    let second = serde_json::to_string(&bridge.handle(request)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_list_templates() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let response = bridge.list_templates(None).unwrap();

    let json = to_json(&response);
    assert_eq!(json["success"], true);
    assert_eq!(json["templates"], json!(["intro", "title", "generate"]));
    assert!(
        json["pdl_file"]
            .as_str()
            .unwrap()
            .ends_with("story-prompts.pdl")
    );
}

#[test]
fn test_list_templates_missing_file() {
    let project = project_with_story();
    let bridge = bridge(project.path(), Box::new(BuiltinEngine));

    let err = bridge.list_templates(Some(Path::new("gone.pdl"))).unwrap_err();

    assert_eq!(err.kind().as_str(), "file_not_found");
}

#[test]
fn test_from_config_uses_project_root_and_engine() {
    let project = project_with_story();
    let config = BridgeConfig {
        project_root: Some(project.path().to_path_buf()),
        ..Default::default()
    };
    assert_eq!(config.engine.kind, EngineKind::Builtin);

    let bridge = Bridge::from_config(&config).unwrap();
    assert_eq!(bridge.project_root(), project.path());

    let response = bridge.handle(r#"{"template": "title", "variables": {"hero": "Ada"}}"#);
    assert_eq!(to_json(&response)["content"], "A tale of Ada");
}
