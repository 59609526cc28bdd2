//! Placeholder substitution shared by both engines.
//!
//! Two syntaxes are supported:
//!
//! - [`Syntax::Braces`]: `{name}` placeholders, `{{` and `}}` render literal
//!   braces. Used for engine command lines (`pdl run {pdl_file}`).
//! - [`Syntax::Dollar`]: `${ expr }` expressions as written in PDL text
//!   blocks. `$${` renders a literal `${`.
//!
//! Lookup is delegated to the caller. A name the caller cannot resolve is an
//! error rather than an empty substitution, so typos in templates surface.

use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Placeholder syntax to scan for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Braces,
    Dollar,
}

/// Error type for substitution failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    /// A name was referenced but could not be resolved.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// An opening delimiter without a closing `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// A placeholder with nothing inside (`{}` or `${ }`).
    #[error("empty expression at position {position} in template")]
    EmptyExpression { position: usize },
}

/// Render `template`, resolving each placeholder through `lookup`.
///
/// Whitespace around a placeholder name is trimmed, so `${ name }` and
/// `${name}` are equivalent.
pub fn render<F>(template: &str, syntax: Syntax, mut lookup: F) -> Result<String, InterpolateError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match (syntax, ch) {
            (Syntax::Braces, '{') => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                } else {
                    let name = read_expression(&mut chars, pos)?;
                    substitute(&mut result, &name, pos, &mut lookup)?;
                }
            }
            (Syntax::Braces, '}') => {
                // `}}` collapses to one brace; a lone `}` is kept as is
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                result.push('}');
            }
            (Syntax::Dollar, '$') => match chars.peek() {
                Some((_, '$')) => {
                    chars.next();
                    if let Some((_, '{')) = chars.peek() {
                        chars.next();
                        result.push_str("${");
                    } else {
                        result.push_str("$$");
                    }
                }
                Some((_, '{')) => {
                    chars.next();
                    let expr = read_expression(&mut chars, pos)?;
                    substitute(&mut result, &expr, pos, &mut lookup)?;
                }
                _ => result.push('$'),
            },
            _ => result.push(ch),
        }
    }

    Ok(result)
}

fn read_expression(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
) -> Result<String, InterpolateError> {
    let mut expr = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) => return Ok(expr),
            Some((_, c)) => expr.push(c),
            None => return Err(InterpolateError::UnmatchedBrace { position: start }),
        }
    }
}

fn substitute<F>(
    result: &mut String,
    expr: &str,
    position: usize,
    lookup: &mut F,
) -> Result<(), InterpolateError>
where
    F: FnMut(&str) -> Option<String>,
{
    let name = expr.trim();
    if name.is_empty() {
        return Err(InterpolateError::EmptyExpression { position });
    }

    match lookup(name) {
        Some(value) => {
            result.push_str(&value);
            Ok(())
        }
        None => Err(InterpolateError::UndefinedVariable {
            name: name.to_string(),
            position,
        }),
    }
}
