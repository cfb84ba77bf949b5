//! Restricted prompt-template rendering.
//!
//! Templates use `{{name}}` placeholders filled from a string-to-string
//! parameter map. Substitution is the only operation supported: there is no
//! expression evaluation, so user-influenced parameter values cannot turn a
//! prompt template into an injection vector. A missing required parameter,
//! a placeholder with no supplied value, or unbalanced braces is a
//! validation error, never a server error.

use crate::PromptTemplate;
use quizsmith_error::{ValidationError, ValidationErrorKind};
use std::collections::HashMap;

/// Render a prompt template against the supplied parameters.
///
/// Checks the template's declared parameter list first, then substitutes
/// every `{{name}}` placeholder in the body.
///
/// # Errors
///
/// Returns a validation error if a declared parameter is absent from
/// `params`, a placeholder in the body has no supplied value, or the body
/// contains unbalanced placeholder braces.
pub fn render_prompt(
    template: &PromptTemplate,
    params: &HashMap<String, String>,
) -> Result<String, ValidationError> {
    for name in &template.parameters {
        if !params.contains_key(name) {
            return Err(ValidationError::new(ValidationErrorKind::Template(
                format!(
                    "missing required parameter '{}' for template '{}'",
                    name, template.name
                ),
            )));
        }
    }

    render(&template.template_text, params)
}

/// Substitute `{{name}}` placeholders in `text` from `params`.
///
/// # Errors
///
/// Returns a validation error for placeholders with no supplied value and
/// for leftover `{{` / `}}` sequences after substitution (malformed
/// template syntax).
pub fn render(text: &str, params: &HashMap<String, String>) -> Result<String, ValidationError> {
    let re = regex::Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").map_err(|e| {
        ValidationError::new(ValidationErrorKind::Template(format!(
            "invalid placeholder pattern: {}",
            e
        )))
    })?;

    let mut rendered = String::with_capacity(text.len());
    let mut last = 0;
    for cap in re.captures_iter(text) {
        let (whole, name) = match (cap.get(0), cap.get(1)) {
            (Some(whole), Some(name)) => (whole, name.as_str()),
            _ => continue,
        };
        let value = params.get(name).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::Template(format!(
                "no value supplied for placeholder '{{{{{}}}}}'",
                name
            )))
        })?;
        rendered.push_str(&text[last..whole.start()]);
        rendered.push_str(value);
        last = whole.end();
    }
    rendered.push_str(&text[last..]);

    if rendered.contains("{{") || rendered.contains("}}") {
        return Err(ValidationError::new(ValidationErrorKind::Template(
            "unbalanced placeholder braces in template".to_string(),
        )));
    }

    Ok(rendered)
}
