//! Model boundary for prompt flows
//!
//! A [`ModelInvoker`] performs exactly one model call per invocation and
//! returns the model's best-effort structured payload, unvalidated. Retry
//! policy belongs to callers; nothing here loops. Cancellation is supported
//! by dropping the returned future, which aborts any in-flight request.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::InvokeResult;
use crate::schema::Schema;

pub mod gemini;

pub use gemini::GeminiInvoker;

/// Client for an external generative-model endpoint
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send one prompt to the model and parse its reply as JSON.
    ///
    /// `output_schema` describes the shape the model is instructed to
    /// produce; the returned value is untrusted and must be validated by the
    /// caller.
    async fn invoke(&self, prompt: &str, output_schema: &Schema) -> InvokeResult<Value>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Instruction block appended to every prompt so the model answers in the
/// flow's output contract.
pub fn output_instructions(schema: &Schema) -> String {
    if schema.is_empty() {
        return "Respond ONLY with a single JSON object. No markdown, no text outside the JSON."
            .to_string();
    }
    format!(
        "Respond ONLY with a single JSON object containing these fields:\n{}\nNo markdown, no code fences, no text outside the JSON object.",
        schema.describe_fields()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Schema};

    #[test]
    fn test_output_instructions_lists_fields() {
        let schema = Schema::new(vec![
            Field::text("response", "The reply shown to the patient."),
            Field::number("confidence", "Confidence between 0 and 1."),
        ])
        .unwrap();

        let instructions = output_instructions(&schema);
        assert!(instructions.contains("\"response\""));
        assert!(instructions.contains("\"confidence\""));
        assert!(instructions.contains("JSON object"));
    }

    #[test]
    fn test_output_instructions_empty_schema() {
        let instructions = output_instructions(&Schema::empty());
        assert!(instructions.contains("JSON object"));
    }
}
