//! Patient AI support flow
//!
//! A chatbot flow that answers patient queries about symptoms,
//! appointments, reports and medication reminders.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionResult, FlowResult};
use crate::flow::{FlowDefinition, FlowExecutor};
use crate::invoker::ModelInvoker;
use crate::schema::{Field, Schema};

pub const FLOW_NAME: &str = "patient-ai-support";

const TEMPLATE: &str = "\
You are a helpful AI assistant designed to help patients manage their health.
You can answer questions about symptoms, book appointments, explain reports, and set medication reminders.

Here is the patient's query:

{{query}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSupportInput {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSupportOutput {
    pub response: String,
}

/// Flow definition for the patient support chatbot
pub fn definition() -> DefinitionResult<FlowDefinition> {
    let input_schema = Schema::new(vec![Field::text(
        "query",
        "The patient's query or request.",
    )])?;

    let output_schema = Schema::new(vec![Field::text(
        "response",
        "The AI chatbot's response to the patient's query.",
    )])?;

    FlowDefinition::new(
        FLOW_NAME,
        "Answers patient queries about symptoms, appointments, reports, and medication reminders.",
        input_schema,
        output_schema,
        TEMPLATE,
    )
}

/// Answer one patient query.
pub async fn patient_support<C: ModelInvoker>(
    executor: &FlowExecutor<C>,
    input: &PatientSupportInput,
) -> FlowResult<PatientSupportOutput> {
    executor.invoke_typed(FLOW_NAME, input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_builds() {
        let definition = definition().unwrap();
        assert_eq!(definition.name(), FLOW_NAME);
        assert_eq!(definition.input_schema().fields().len(), 1);
        assert_eq!(definition.output_schema().fields().len(), 1);
    }

    #[test]
    fn test_template_ends_with_query() {
        let renderer = crate::render::PromptRenderer::new();
        let definition = definition().unwrap();
        let input = json!({ "query": "Can I take ibuprofen with my blood pressure medication?" });

        let prompt = renderer.render(definition.template(), &input).unwrap();
        assert!(prompt.ends_with("Can I take ibuprofen with my blood pressure medication?"));
    }
}
