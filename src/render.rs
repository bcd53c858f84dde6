//! Prompt template rendering
//!
//! Flow prompts are Handlebars templates rendered against validated input.
//! Strict mode keeps missing fields loud instead of substituting blanks, and
//! HTML escaping is off because the output is plain prompt text, not markup.

use handlebars::Handlebars;
use regex::Regex;
use serde_json::Value;

use crate::error::{RenderError, RenderResult};

/// Renders flow templates against validated input values
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Expand every placeholder in `template` with the matching field of
    /// `data`. Booleans render as their literal token, numbers in decimal
    /// form, text verbatim. Deterministic given (template, data).
    pub fn render(&self, template: &str, data: &Value) -> RenderResult<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| RenderError::Render {
                message: e.to_string(),
            })
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Field names referenced by a template, in first-appearance order.
///
/// Understands value placeholders (`{{name}}`, `{{{name}}}`) and the subjects
/// of `{{#if}}`/`{{#unless}}` blocks. Closing tags and `{{else}}` are not
/// field references.
pub fn template_fields(template: &str) -> Vec<String> {
    let placeholder_re = Regex::new(
        r"\{\{\{?\s*(?:#(?:if|unless)\s+)?([A-Za-z_][A-Za-z0-9_]*)(?:\.[A-Za-z0-9_]+)*\s*\}\}\}?",
    )
    .unwrap();

    let mut fields = Vec::new();
    for caps in placeholder_re.captures_iter(template) {
        let name = &caps[1];
        if name == "else" || name == "this" {
            continue;
        }
        if !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}
