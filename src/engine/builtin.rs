//! Built-in engine for literal text templates.
//!
//! Renders the subset of PDL that needs no interpreter: plain strings and
//! `text` blocks (a string or a list of blocks, concatenated). `${ name }`
//! and dotted paths such as `${ hero.name }` or `${ chapters.0 }` are
//! resolved against the request variables.
//!
//! ```yaml
//! defs:
//!   intro:
//!     description: Opening line
//!     text:
//!       - "Once upon a time, ${ hero } "
//!       - text: "lived in ${ place }."
//! ```
//!
//! Any other block kind (`model`, `code`, `def`, ...) is refused.

use super::interpolate::{Syntax, render};
use super::{EngineError, Invocation, TemplateEngine};
use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;

/// Mapping keys that carry no output and are ignored.
const METADATA_KEYS: &[&str] = &["description", "role"];

/// Engine that renders literal text blocks in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl TemplateEngine for BuiltinEngine {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn execute(&self, invocation: &Invocation<'_>) -> Result<String, EngineError> {
        let mut output = String::new();
        render_block(invocation.definition, invocation.variables, &mut output)?;
        Ok(output)
    }
}

fn render_block(
    block: &YamlValue,
    variables: &Map<String, Value>,
    output: &mut String,
) -> Result<(), EngineError> {
    match block {
        YamlValue::Null => {}
        YamlValue::Bool(b) => output.push_str(&b.to_string()),
        YamlValue::Number(n) => output.push_str(&n.to_string()),
        YamlValue::String(s) => {
            let text = render(s, Syntax::Dollar, |path| lookup(variables, path))?;
            output.push_str(&text);
        }
        YamlValue::Sequence(blocks) => {
            for block in blocks {
                render_block(block, variables, output)?;
            }
        }
        YamlValue::Mapping(mapping) => {
            let mut text = None;
            for (key, value) in mapping {
                match key.as_str() {
                    Some("text") => text = Some(value),
                    Some(key) if METADATA_KEYS.contains(&key) => {}
                    Some(key) => return Err(EngineError::Unsupported(key.to_string())),
                    None => return Err(EngineError::Unsupported(format!("{:?}", key))),
                }
            }
            match text {
                Some(text) => render_block(text, variables, output)?,
                None => {
                    return Err(EngineError::Unsupported(
                        "mapping without 'text'".to_string(),
                    ));
                }
            }
        }
        YamlValue::Tagged(tagged) => {
            return Err(EngineError::Unsupported(tagged.tag.to_string()));
        }
    }
    Ok(())
}

/// Resolve a dotted path (`hero.name`, `chapters.0`) against the variables.
///
/// Strings render raw; every other JSON value renders as compact JSON.
fn lookup(variables: &Map<String, Value>, path: &str) -> Option<String> {
    let mut segments = path.split('.').map(str::trim);
    let mut current = variables.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(match current {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
