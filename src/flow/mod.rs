//! Prompt-flow core
//!
//! Binds one input schema, one output schema and one template to a named,
//! callable unit, and drives invocations through
//! validate -> render -> invoke -> validate.

pub mod definition;
pub mod executor;
pub mod registry;

pub use definition::{FlowDefinition, FlowDefinitionWrapper};
pub use executor::{FlowExecutor, Invocation};
pub use registry::FlowRegistry;
