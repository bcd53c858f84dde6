//! Flow registry
//!
//! Holds every declared flow for the lifetime of the process. Built once at
//! startup; lookups are read-only after that.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DefinitionError, DefinitionResult};

use super::definition::FlowDefinition;

/// Registry of declared flows, keyed by unique name
#[derive(Debug, Default)]
pub struct FlowRegistry {
    flows: HashMap<String, FlowDefinition>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flow. Names are unique; re-registration is an error.
    pub fn register(&mut self, definition: FlowDefinition) -> DefinitionResult<()> {
        let name = definition.name().to_string();
        if self.flows.contains_key(&name) {
            return Err(DefinitionError::DuplicateFlow { name });
        }
        self.flows.insert(name, definition);
        Ok(())
    }

    /// Register a flow parsed from YAML.
    pub fn register_yaml_str(&mut self, yaml: &str) -> DefinitionResult<()> {
        self.register(FlowDefinition::from_yaml_str(yaml)?)
    }

    /// Register a flow loaded from a YAML file.
    pub fn register_yaml_file(&mut self, path: impl AsRef<Path>) -> DefinitionResult<()> {
        self.register(FlowDefinition::from_yaml_file(path)?)
    }

    pub fn get(&self, name: &str) -> Option<&FlowDefinition> {
        self.flows.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    /// Registered flow names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.flows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, Schema};

    fn support_flow(name: &str) -> FlowDefinition {
        FlowDefinition::new(
            name,
            "Answers patient queries.",
            Schema::new(vec![Field::text("query", "The patient's query.")]).unwrap(),
            Schema::new(vec![Field::text("response", "The reply.")]).unwrap(),
            "{{query}}",
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FlowRegistry::new();
        registry.register(support_flow("patient-ai-support")).unwrap();

        assert!(registry.contains("patient-ai-support"));
        assert_eq!(registry.len(), 1);
        let definition = registry.get("patient-ai-support").unwrap();
        assert_eq!(definition.description(), "Answers patient queries.");
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = FlowRegistry::new();
        registry.register(support_flow("patient-ai-support")).unwrap();
        let err = registry
            .register(support_flow("patient-ai-support"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateFlow { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = FlowRegistry::new();
        registry.register(support_flow("triage-suggestions")).unwrap();
        registry.register(support_flow("patient-ai-support")).unwrap();
        assert_eq!(
            registry.names(),
            vec!["patient-ai-support", "triage-suggestions"]
        );
    }
}
