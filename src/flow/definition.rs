//! Flow definitions
//!
//! A flow is configuration: one input contract, one output contract, and a
//! prompt template, bound to a unique name. Definitions are immutable once
//! constructed and validated at construction time so template defects
//! surface at startup, not mid-request. Definitions can be built in code or
//! loaded from YAML files; both paths go through the same checks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, DefinitionResult};
use crate::render::template_fields;
use crate::schema::Schema;

/// A declared prompt flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawFlowDefinition")]
pub struct FlowDefinition {
    name: String,
    description: String,
    input_schema: Schema,
    output_schema: Schema,
    template: String,
}

/// Unvalidated wire form; `FlowDefinition::new` is the only way in.
#[derive(Debug, Clone, Deserialize)]
struct RawFlowDefinition {
    name: String,
    description: String,
    input_schema: Schema,
    output_schema: Schema,
    template: String,
}

impl TryFrom<RawFlowDefinition> for FlowDefinition {
    type Error = DefinitionError;

    fn try_from(raw: RawFlowDefinition) -> Result<Self, Self::Error> {
        FlowDefinition::new(
            raw.name,
            raw.description,
            raw.input_schema,
            raw.output_schema,
            raw.template,
        )
    }
}

/// YAML file wrapper - definitions are nested under a `flow:` key
#[derive(Debug, Clone, Deserialize)]
pub struct FlowDefinitionWrapper {
    pub flow: FlowDefinition,
}

impl FlowDefinition {
    /// Build a flow definition, checking the template against the input
    /// schema: every referenced field must be declared.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Schema,
        output_schema: Schema,
        template: impl Into<String>,
    ) -> DefinitionResult<Self> {
        let name = name.into();
        let template = template.into();

        for field in template_fields(&template) {
            if input_schema.field(&field).is_none() {
                return Err(DefinitionError::UnknownTemplateField { flow: name, field });
            }
        }

        Ok(Self {
            name,
            description: description.into(),
            input_schema,
            output_schema,
            template,
        })
    }

    /// Parse a definition from YAML (wrapped under a `flow:` key).
    pub fn from_yaml_str(yaml: &str) -> DefinitionResult<Self> {
        let wrapper: FlowDefinitionWrapper = serde_yaml::from_str(yaml)?;
        Ok(wrapper.flow)
    }

    /// Load a definition from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DefinitionResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn minimal_schemas() -> (Schema, Schema) {
        let input = Schema::new(vec![Field::text("query", "The patient's query.")]).unwrap();
        let output = Schema::new(vec![Field::text("response", "The reply.")]).unwrap();
        (input, output)
    }

    #[test]
    fn test_definition_accepts_declared_fields() {
        let (input, output) = minimal_schemas();
        let definition = FlowDefinition::new(
            "patient-ai-support",
            "Answers patient queries.",
            input,
            output,
            "Here is the patient's query:\n\n{{query}}",
        )
        .unwrap();
        assert_eq!(definition.name(), "patient-ai-support");
        assert_eq!(definition.input_schema().fields().len(), 1);
    }

    #[test]
    fn test_definition_rejects_undeclared_template_field() {
        let (input, output) = minimal_schemas();
        let err = FlowDefinition::new(
            "patient-ai-support",
            "Answers patient queries.",
            input,
            output,
            "Query: {{query}}\nHistory: {{chatHistory}}",
        )
        .unwrap_err();

        match err {
            DefinitionError::UnknownTemplateField { flow, field } => {
                assert_eq!(flow, "patient-ai-support");
                assert_eq!(field, "chatHistory");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_definition_checks_conditional_subjects() {
        let (input, output) = minimal_schemas();
        let err = FlowDefinition::new(
            "patient-ai-support",
            "Answers patient queries.",
            input,
            output,
            "{{#if urgent}}URGENT{{/if}} {{query}}",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::UnknownTemplateField { .. }
        ));
    }

    #[test]
    fn test_parse_flow_yaml() {
        let yaml = r#"
flow:
  name: triage-suggestions
  description: Suggests a doctor, priority level, and tests from symptoms and vitals.
  input_schema:
    - name: symptoms
      kind: text
      description: The symptoms the patient is experiencing.
    - name: vitals
      kind: text
      description: The patient vitals, such as temperature, blood pressure, heart rate, etc.
  output_schema:
    - name: suggestedDoctor
      kind: text
      description: The suggested doctor for the patient based on their symptoms and vitals.
    - name: suggestedPriority
      kind: text
      description: The suggested priority level for the patient (e.g., high, medium, low).
    - name: suggestedTests
      kind: text
      description: The suggested tests for the patient based on their symptoms and vitals.
  template: |
    You are an AI triage assistant. Given the following patient symptoms and vitals, suggest a doctor, priority level, and tests.

    Symptoms: {{{symptoms}}}
    Vitals: {{{vitals}}}
"#;
        let definition = FlowDefinition::from_yaml_str(yaml).unwrap();
        assert_eq!(definition.name(), "triage-suggestions");
        assert_eq!(definition.input_schema().fields().len(), 2);
        assert_eq!(definition.output_schema().fields().len(), 3);
        assert!(definition.template().contains("{{{symptoms}}}"));
    }

    #[test]
    fn test_parse_flow_yaml_rejects_bad_template() {
        let yaml = r#"
flow:
  name: broken
  description: Template references a field the schema does not declare.
  input_schema:
    - name: query
      kind: text
      description: The query.
  output_schema: []
  template: "{{query}} {{missing}}"
"#;
        let err = FlowDefinition::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
