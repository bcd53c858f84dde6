//! Flow execution pipeline
//!
//! `FlowExecutor` drives an invocation through its stages: validate input,
//! render the prompt, invoke the model, validate the model's output. Each
//! stage failure maps to one `FlowError` variant. Nothing is retried and no
//! output is patched; a model that breaks its contract is surfaced as such.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{FlowError, FlowResult};
use crate::invoker::ModelInvoker;
use crate::render::PromptRenderer;

use super::registry::FlowRegistry;

/// Record of one completed flow invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Unique ID for this invocation
    pub invocation_id: Uuid,

    /// Flow that was executed
    pub flow: String,

    /// Input after validation and coercion
    pub input: Value,

    /// Prompt sent to the model, before output instructions were appended
    pub rendered_prompt: String,

    /// Raw payload parsed from the model response
    pub raw_output: Value,

    /// Output after validation and coercion
    pub output: Value,

    /// Timestamp
    pub created_at: chrono::DateTime<Utc>,
}

/// Executes registered flows against a model invoker
///
/// Holds no mutable state. Invocations are independent, so one executor can
/// serve arbitrarily many concurrent calls; the only suspend point is the
/// model request itself.
pub struct FlowExecutor<C: ModelInvoker> {
    registry: FlowRegistry,
    invoker: C,
    renderer: PromptRenderer,
}

impl<C: ModelInvoker> FlowExecutor<C> {
    pub fn new(registry: FlowRegistry, invoker: C) -> Self {
        Self {
            registry,
            invoker,
            renderer: PromptRenderer::new(),
        }
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &C {
        &self.invoker
    }

    /// Run one flow invocation end to end.
    pub async fn invoke(&self, flow_name: &str, input: Value) -> FlowResult<Invocation> {
        let definition = self
            .registry
            .get(flow_name)
            .ok_or_else(|| FlowError::UnknownFlow {
                name: flow_name.to_string(),
            })?;

        debug!(flow = %flow_name, "Validating flow input");
        let input = definition.input_schema().validate(&input).map_err(|e| {
            warn!(flow = %flow_name, error = %e, "Flow input rejected");
            FlowError::InvalidInput(e)
        })?;

        debug!(flow = %flow_name, "Rendering prompt");
        let rendered_prompt = self.renderer.render(definition.template(), &input)?;

        debug!(flow = %flow_name, model = %self.invoker.model_name(), "Invoking model");
        let raw_output = self
            .invoker
            .invoke(&rendered_prompt, definition.output_schema())
            .await?;

        debug!(flow = %flow_name, "Validating model output");
        let output = definition.output_schema().validate(&raw_output).map_err(|e| {
            warn!(flow = %flow_name, error = %e, "Model output rejected");
            FlowError::InvalidModelOutput(e)
        })?;

        let invocation = Invocation {
            invocation_id: Uuid::now_v7(),
            flow: flow_name.to_string(),
            input,
            rendered_prompt,
            raw_output,
            output,
            created_at: Utc::now(),
        };

        info!(
            flow = %flow_name,
            invocation_id = %invocation.invocation_id,
            "Flow invocation complete"
        );
        Ok(invocation)
    }

    /// Typed wrapper over [`Self::invoke`]: serialize the input struct, run
    /// the flow, deserialize the validated output.
    pub async fn invoke_typed<I, O>(&self, flow_name: &str, input: &I) -> FlowResult<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let input_value = serde_json::to_value(input)?;
        let invocation = self.invoke(flow_name, input_value).await?;
        Ok(serde_json::from_value(invocation.output)?)
    }
}
