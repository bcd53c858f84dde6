//! Triage suggestions flow
//!
//! Suggests a doctor, a priority level and a set of tests from
//! patient symptoms and vitals.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionResult, FlowResult};
use crate::flow::{FlowDefinition, FlowExecutor};
use crate::invoker::ModelInvoker;
use crate::schema::{Field, Schema};

pub const FLOW_NAME: &str = "triage-suggestions";

const TEMPLATE: &str = "\
You are an AI triage assistant. Given the following patient symptoms and vitals, suggest a doctor, priority level, and tests.

Symptoms: {{{symptoms}}}
Vitals: {{{vitals}}}

Consider all information provided when making your suggestions. Return the suggested doctor, priority and tests.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageInput {
    pub symptoms: String,
    pub vitals: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageOutput {
    pub suggested_doctor: String,
    pub suggested_priority: String,
    pub suggested_tests: String,
}

/// Flow definition for triage suggestions
pub fn definition() -> DefinitionResult<FlowDefinition> {
    let input_schema = Schema::new(vec![
        Field::text("symptoms", "The symptoms the patient is experiencing."),
        Field::text(
            "vitals",
            "The patient vitals, such as temperature, blood pressure, heart rate, etc.",
        ),
    ])?;

    let output_schema = Schema::new(vec![
        Field::text(
            "suggestedDoctor",
            "The suggested doctor for the patient based on their symptoms and vitals.",
        ),
        Field::text(
            "suggestedPriority",
            "The suggested priority level for the patient (e.g., high, medium, low).",
        ),
        Field::text(
            "suggestedTests",
            "The suggested tests for the patient based on their symptoms and vitals.",
        ),
    ])?;

    FlowDefinition::new(
        FLOW_NAME,
        "Suggests a doctor, priority level, and tests from patient symptoms and vitals.",
        input_schema,
        output_schema,
        TEMPLATE,
    )
}

/// Produce triage suggestions for one patient.
pub async fn suggest_triage<C: ModelInvoker>(
    executor: &FlowExecutor<C>,
    input: &TriageInput,
) -> FlowResult<TriageOutput> {
    executor.invoke_typed(FLOW_NAME, input).await
}
