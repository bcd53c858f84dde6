//! Built-in hospital flows
//!
//! Each submodule packages one flow: its definition (schemas plus prompt
//! template), typed input/output structs, and an async entry point that
//! runs it through a [`FlowExecutor`](crate::flow::FlowExecutor).

pub mod document_extraction;
pub mod patient_support;
pub mod risk_prediction;
pub mod triage;

use crate::error::DefinitionResult;
use crate::flow::FlowRegistry;

/// Registry pre-loaded with every built-in flow.
pub fn registry() -> DefinitionResult<FlowRegistry> {
    let mut registry = FlowRegistry::new();
    registry.register(risk_prediction::definition()?)?;
    registry.register(document_extraction::definition()?)?;
    registry.register(patient_support::definition()?)?;
    registry.register(triage::definition()?)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_flows() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 4);
        assert!(registry.contains(risk_prediction::FLOW_NAME));
        assert!(registry.contains(document_extraction::FLOW_NAME));
        assert!(registry.contains(patient_support::FLOW_NAME));
        assert!(registry.contains(triage::FLOW_NAME));
    }

    #[test]
    fn test_registry_names_sorted() {
        let registry = registry().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "disease-risk-prediction",
                "extract-medical-document-info",
                "patient-ai-support",
                "triage-suggestions",
            ]
        );
    }
}
