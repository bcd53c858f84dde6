//! Medical document extraction flow
//!
//! Pulls the patient name, diagnosis and relevant findings out of
//! free-form medical document text.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionResult, FlowResult};
use crate::flow::{FlowDefinition, FlowExecutor};
use crate::invoker::ModelInvoker;
use crate::schema::{Field, Schema};

pub const FLOW_NAME: &str = "extract-medical-document-info";

const TEMPLATE: &str = "\
You are an expert medical document analyzer. Your task is to extract key information from the provided medical document text.

Specifically, you need to identify and extract the following:
- Patient Name: The full name of the patient mentioned in the document.
- Diagnosis: The primary diagnosis or medical condition identified in the document.
- Relevant Values: Any significant values, findings, or observations noted in the document (e.g., lab results, measurements).

Please provide the extracted information in a structured format.

Medical Document Text: {{{documentText}}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractDocumentInput {
    pub document_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractDocumentOutput {
    pub patient_name: String,
    pub diagnosis: String,
    pub relevant_values: String,
}

/// Flow definition for medical document extraction
pub fn definition() -> DefinitionResult<FlowDefinition> {
    let input_schema = Schema::new(vec![Field::text(
        "documentText",
        "The text content of the medical document to be analyzed.",
    )])?;

    let output_schema = Schema::new(vec![
        Field::text("patientName", "The name of the patient."),
        Field::text("diagnosis", "The diagnosis extracted from the document."),
        Field::text(
            "relevantValues",
            "Any relevant values or findings from the document.",
        ),
    ])?;

    FlowDefinition::new(
        FLOW_NAME,
        "Extracts patient name, diagnosis, and relevant values from medical document text.",
        input_schema,
        output_schema,
        TEMPLATE,
    )
}

/// Extract structured information from one document.
pub async fn extract_document_info<C: ModelInvoker>(
    executor: &FlowExecutor<C>,
    input: &ExtractDocumentInput,
) -> FlowResult<ExtractDocumentOutput> {
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
        assert_eq!(definition.output_schema().fields().len(), 3);
    }

    #[test]
    fn test_template_embeds_document_text() {
        let renderer = crate::render::PromptRenderer::new();
        let definition = definition().unwrap();
        let input = json!({
            "documentText": "Patient: Jane Roe. Dx: Type 2 Diabetes. HbA1c 8.2%."
        });

        let prompt = renderer.render(definition.template(), &input).unwrap();
        assert!(prompt.contains("Medical Document Text: Patient: Jane Roe."));
        assert!(prompt.contains("HbA1c 8.2%"));
    }

    #[test]
    fn test_output_requires_all_fields() {
        let definition = definition().unwrap();
        let missing_diagnosis = json!({
            "patientName": "Jane Roe",
            "relevantValues": "HbA1c 8.2%"
        });
        assert!(definition.output_schema().validate(&missing_diagnosis).is_err());
    }
}
