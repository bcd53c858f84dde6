//! MediSys AI - Typed Prompt Flow Execution
//!
//! This crate runs the AI flows behind the MediSys hospital platform:
//! disease risk prediction, medical document extraction, patient support
//! chat, and triage suggestions.
//!
//! ## Architecture
//! Every flow follows the same pipeline:
//! Input JSON -> Schema Validate -> Render Prompt -> Invoke Model -> Schema Validate -> Output JSON
//!
//! A [`flow::FlowDefinition`] couples an input schema, an output schema and a
//! Handlebars prompt template. The [`flow::FlowExecutor`] drives definitions
//! through any [`invoker::ModelInvoker`], so tests swap the Gemini backend
//! for a canned one without touching flow code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medisys_ai::flow::FlowExecutor;
//! use medisys_ai::flows::{self, risk_prediction};
//! use medisys_ai::flows::risk_prediction::{ActivityLevel, DiseaseRiskInput, Gender};
//! use medisys_ai::invoker::GeminiInvoker;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = flows::registry()?;
//!     let invoker = GeminiInvoker::from_env()?;
//!     let executor = FlowExecutor::new(registry, invoker);
//!
//!     let input = DiseaseRiskInput {
//!         age: 45,
//!         gender: Gender::Male,
//!         bmi: 25.0,
//!         systolic_blood_pressure: 120,
//!         diastolic_blood_pressure: 80,
//!         cholesterol: 200,
//!         smoking: false,
//!         activity_level: ActivityLevel::Moderate,
//!         family_history: false,
//!     };
//!     let output = risk_prediction::predict_disease_risk(&executor, &input).await?;
//!     println!("heart disease risk: {}", output.heart_disease_risk);
//!     Ok(())
//! }
//! ```

// Core error handling
pub mod error;

// Field schemas and JSON validation
pub mod schema;

// Handlebars prompt rendering
pub mod render;

// Model backend configuration
pub mod config;

// Model invocation (Gemini backend plus the ModelInvoker trait)
pub mod invoker;

// Flow definitions, registry and executor
pub mod flow;

// Built-in hospital flows
pub mod flows;

// Re-export the common working set
pub use config::GeminiConfig;
pub use error::{
    DefinitionError, FlowError, FlowResult, InvokeError, RenderError, ValidationError,
};
pub use flow::{FlowDefinition, FlowExecutor, FlowRegistry, Invocation};
pub use invoker::{GeminiInvoker, ModelInvoker};
pub use render::PromptRenderer;
pub use schema::{Field, FieldKind, Schema};
