//! Error types for the prompt-flow execution core
//!
//! One enum per pipeline stage, aggregated under `FlowError` so callers can
//! match on the stage that failed. No error is swallowed inside the core;
//! every failure surfaces as one of these typed conditions.

use thiserror::Error;

/// Top-level error for a flow invocation
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Unknown flow '{name}'")]
    UnknownFlow { name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(#[source] ValidationError),

    #[error("Template configuration error: {0}")]
    TemplateConfiguration(#[from] RenderError),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] InvokeError),

    #[error("Invalid model output: {0}")]
    InvalidModelOutput(#[source] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Field-level validation errors from schema checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}': expected {expected}, found {actual}")]
    KindMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Field '{field}': '{actual}' is not one of {allowed:?}")]
    InvalidChoice {
        field: String,
        allowed: Vec<String>,
        actual: String,
    },

    #[error("Expected an object, found {actual}")]
    NotAnObject { actual: String },
}

/// Errors raised while constructing schemas, flow definitions and registries
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Duplicate field '{field}' in schema")]
    DuplicateField { field: String },

    #[error("Template for flow '{flow}' references undeclared field '{field}'")]
    UnknownTemplateField { flow: String, field: String },

    #[error("Flow '{name}' is already registered")]
    DuplicateFlow { name: String },

    #[error("Invalid flow definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prompt template rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template syntax error: {message}")]
    Syntax { message: String },

    #[error("Template render failed: {message}")]
    Render { message: String },
}

/// Errors from the model boundary
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("API key is missing or empty")]
    MissingApiKey,

    #[error("Failed to connect to model endpoint: {message}")]
    Connection { message: String },

    #[error("Model request timed out: {message}")]
    Timeout { message: String },

    #[error("Model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned no usable candidates")]
    EmptyResponse,

    #[error("Model response blocked: {reason}")]
    Blocked { reason: String },

    #[error("Failed to parse model response as JSON: {snippet}")]
    ResponseParse { snippet: String },
}

/// Result type aliases for convenience
pub type FlowResult<T> = Result<T, FlowError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type InvokeResult<T> = Result<T, InvokeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let validation_err = ValidationError::MissingField {
            field: "symptoms".to_string(),
        };

        let flow_err = FlowError::InvalidInput(validation_err);
        assert!(matches!(flow_err, FlowError::InvalidInput(_)));
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = ValidationError::KindMismatch {
            field: "age".to_string(),
            expected: "number".to_string(),
            actual: "boolean".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("age"));
        assert!(message.contains("number"));
        assert!(message.contains("boolean"));
    }

    #[test]
    fn test_invalid_choice_lists_allowed_values() {
        let err = ValidationError::InvalidChoice {
            field: "gender".to_string(),
            allowed: vec!["male".to_string(), "female".to_string()],
            actual: "unknown".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("gender"));
        assert!(message.contains("male"));
        assert!(message.contains("female"));
    }

    #[test]
    fn test_flow_error_wraps_invoke_error() {
        let invoke_err = InvokeError::Api {
            status: 503,
            body: "overloaded".to_string(),
        };
        let flow_err: FlowError = invoke_err.into();
        assert!(matches!(flow_err, FlowError::ModelInvocation(_)));
        assert!(flow_err.to_string().contains("503"));
    }
}
