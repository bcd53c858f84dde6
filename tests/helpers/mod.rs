//! Shared mock invokers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use medisys_ai::error::InvokeResult;
use medisys_ai::invoker::ModelInvoker;
use medisys_ai::schema::Schema;

/// Returns scripted responses in order, repeating the last one when the
/// script runs out. Tracks how many calls were made.
pub struct ScriptedInvoker {
    responses: Vec<Value>,
    calls: AtomicUsize,
}

impl ScriptedInvoker {
    pub fn new(responses: Vec<Value>) -> Self {
        assert!(!responses.is_empty(), "script needs at least one response");
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(&self, _prompt: &str, _output_schema: &Schema) -> InvokeResult<Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let last = self.responses.len() - 1;
        Ok(self.responses[n.min(last)].clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Derives each response from the rendered prompt, so tests can prove an
/// output came from its own input. Yields briefly to let concurrent
/// invocations interleave.
pub struct FnInvoker<F> {
    f: F,
}

impl<F> FnInvoker<F>
where
    F: Fn(&str, &Schema) -> InvokeResult<Value> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ModelInvoker for FnInvoker<F>
where
    F: Fn(&str, &Schema) -> InvokeResult<Value> + Send + Sync,
{
    async fn invoke(&self, prompt: &str, output_schema: &Schema) -> InvokeResult<Value> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        (self.f)(prompt, output_schema)
    }

    fn model_name(&self) -> &str {
        "prompt-derived"
    }
}

/// Stalls the first call for 30 seconds, then answers instantly. Proves
/// that dropping one in-flight invocation leaves the executor usable.
pub struct SlowFirstInvoker {
    response: Value,
    calls: AtomicUsize,
}

impl SlowFirstInvoker {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for SlowFirstInvoker {
    async fn invoke(&self, _prompt: &str, _output_schema: &Schema) -> InvokeResult<Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "slow-first"
    }
}
