//! Message template rendering
//!
//! Supports format-style fields:
//! - `{}` / `{0}` - positional arguments (auto-numbered or explicit)
//! - `{name}` - keyword arguments; unresolved keywords render as `None`
//! - `{{` / `}}` - literal braces
//!
//! Conversion and format specs (`{name!r}`, `{value:>8}`) are accepted and
//! ignored.

use std::collections::HashMap;
use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Matches escaped braces or a replacement field
static FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("field pattern is valid"));

/// Rendered in place of a keyword field with no value
pub const UNRESOLVED: &str = "None";

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing positional argument {index}")]
    MissingPositional { index: usize },

    #[error("Single '{brace}' encountered at byte {position}")]
    UnbalancedBrace { brace: char, position: usize },
}

/// Positional and keyword values for rendering
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    positional: Vec<String>,
    named: HashMap<String, String>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.named.insert(name.into(), value.to_string());
        self
    }
}

/// Render a single template
pub fn render_template(template: &str, args: &TemplateArgs) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    let mut next_auto = 0;

    for caps in FIELD_PATTERN.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut rendered, template, last, whole.start())?;
        last = whole.end();

        match whole.as_str() {
            "{{" => rendered.push('{'),
            "}}" => rendered.push('}'),
            _ => {
                let field = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let name = field
                    .split(['!', ':'])
                    .next()
                    .unwrap_or_default()
                    .trim();

                if name.is_empty() {
                    rendered.push_str(positional(args, next_auto)?);
                    next_auto += 1;
                } else if let Ok(index) = name.parse::<usize>() {
                    rendered.push_str(positional(args, index)?);
                } else {
                    let value = args.named.get(name).map(String::as_str);
                    rendered.push_str(value.unwrap_or(UNRESOLVED));
                }
            }
        }
    }

    push_literal(&mut rendered, template, last, template.len())?;
    Ok(rendered)
}

/// Render every template in `templates` with the same arguments
pub fn render_templates<S: AsRef<str>>(
    templates: &[S],
    args: &TemplateArgs,
) -> Result<Vec<String>, TemplateError> {
    templates
        .iter()
        .map(|t| render_template(t.as_ref(), args))
        .collect()
}

fn positional(args: &TemplateArgs, index: usize) -> Result<&str, TemplateError> {
    args.positional
        .get(index)
        .map(String::as_str)
        .ok_or(TemplateError::MissingPositional { index })
}

fn push_literal(
    rendered: &mut String,
    template: &str,
    start: usize,
    end: usize,
) -> Result<(), TemplateError> {
    let literal = &template[start..end];
    if let Some(offset) = literal.find(['{', '}']) {
        let brace = literal[offset..].chars().next().unwrap_or('{');
        return Err(TemplateError::UnbalancedBrace {
            brace,
            position: start + offset,
        });
    }
    rendered.push_str(literal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fields() {
        let rendered = render_template("Push the red button", &TemplateArgs::new()).unwrap();
        assert_eq!(rendered, "Push the red button");
    }

    #[test]
    fn test_named_fields() {
        let args = TemplateArgs::new().named("frequency", 50).named("unit", "Hz");
        let rendered = render_template("Frequency {frequency} {unit}", &args).unwrap();
        assert_eq!(rendered, "Frequency 50 Hz");
    }

    #[test]
    fn test_unresolved_named_field_renders_sentinel() {
        let rendered = render_template("Serial: {serial}", &TemplateArgs::new()).unwrap();
        assert_eq!(rendered, "Serial: None");
    }

    #[test]
    fn test_positional_fields() {
        let args = TemplateArgs::new().arg("a").arg("b");
        assert_eq!(render_template("{} then {}", &args).unwrap(), "a then b");
        assert_eq!(render_template("{1} then {0}", &args).unwrap(), "b then a");
    }

    #[test]
    fn test_missing_positional_is_error() {
        let err = render_template("{2}", &TemplateArgs::new().arg("a")).unwrap_err();
        assert_eq!(err, TemplateError::MissingPositional { index: 2 });
    }

    #[test]
    fn test_escaped_braces_and_specs() {
        let args = TemplateArgs::new().named("v", 3.3);
        let rendered = render_template("{{raw}} {v:>8} {v!r}", &args).unwrap();
        assert_eq!(rendered, "{raw} 3.3 3.3");
    }

    #[test]
    fn test_unbalanced_brace() {
        let err = render_template("oops }", &TemplateArgs::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnbalancedBrace {
                brace: '}',
                position: 5
            }
        );
    }

    #[test]
    fn test_render_list() {
        let args = TemplateArgs::new().named("name", "DUT-1");
        let rendered = render_templates(&["Testing {name}", "Done {name}"], &args).unwrap();
        assert_eq!(rendered, vec!["Testing DUT-1", "Done DUT-1"]);
    }
}
