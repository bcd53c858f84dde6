//! Google Gemini client
//!
//! One `generateContent` call per invocation. Structured output is requested
//! twice over: `responseSchema` for endpoints that support schema-guided
//! decoding, plus an instruction block appended to the prompt for models
//! that ignore it. The response text is still treated as untrusted and run
//! through a JSON repair ladder before being handed back.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use super::{output_instructions, ModelInvoker};
use crate::config::GeminiConfig;
use crate::error::{InvokeError, InvokeResult};
use crate::schema::Schema;

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiInvoker {
    config: GeminiConfig,
    client: Client,
}

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    // Safety-blocked candidates come back without content
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiInvoker {
    /// Create a new Gemini invoker
    pub fn new(config: GeminiConfig) -> InvokeResult<Self> {
        if config.api_key.is_empty() {
            return Err(InvokeError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    /// Create an invoker from `GEMINI_*` environment variables.
    pub fn from_env() -> InvokeResult<Self> {
        Self::new(GeminiConfig::from_env())
    }

    fn build_request(&self, full_prompt: String, output_schema: &Schema) -> GeminiRequest {
        let response_schema = if output_schema.is_empty() {
            None
        } else {
            Some(output_schema.response_schema())
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: full_prompt }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: Some(0.8),
                top_k: Some(40),
                response_mime_type: Some("application/json".to_string()),
                response_schema,
            }),
        }
    }
}

#[async_trait]
impl ModelInvoker for GeminiInvoker {
    async fn invoke(&self, prompt: &str, output_schema: &Schema) -> InvokeResult<Value> {
        let full_prompt = format!("{}\n\n{}", prompt, output_instructions(output_schema));
        let request_body = self.build_request(full_prompt, output_schema);

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        debug!(
            model = %self.config.model,
            "Sending request to Gemini API: {}",
            url.replace(&self.config.api_key, "***")
        );

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        debug!(status = %status, "Gemini API response received");

        if !status.is_success() {
            error!(status = %status, "Gemini API error: {}", body);
            return Err(InvokeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| InvokeError::ResponseParse {
                snippet: format!("{}: {}", e, truncate(&body, 200)),
            })?;

        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini API usage"
            );
        }

        let text = candidate_text(gemini_response)?;
        extract_json(&text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn map_transport_error(e: reqwest::Error) -> InvokeError {
    // The request URL carries the API key as a query parameter; strip it
    // before the error surfaces to callers.
    let e = e.without_url();
    if e.is_timeout() {
        InvokeError::Timeout {
            message: e.to_string(),
        }
    } else if e.is_connect() {
        InvokeError::Connection {
            message: e.to_string(),
        }
    } else {
        InvokeError::Http(e)
    }
}

/// Pull the first candidate's text out of a response, surfacing safety
/// blocks and empty candidates as typed errors.
fn candidate_text(response: GeminiResponse) -> InvokeResult<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(InvokeError::EmptyResponse)?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if matches!(reason, "SAFETY" | "PROHIBITED_CONTENT" | "RECITATION") {
            return Err(InvokeError::Blocked {
                reason: reason.to_string(),
            });
        }
    }

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let text: String = parts.into_iter().map(|p| p.text).collect();
    if text.is_empty() {
        return Err(InvokeError::EmptyResponse);
    }
    Ok(text)
}

/// Parse model text into JSON, tolerating markdown fences and surrounding
/// prose.
fn extract_json(content: &str) -> InvokeResult<Value> {
    // Direct parse first
    if let Ok(v) = serde_json::from_str(content) {
        return Ok(v);
    }

    // Markdown code block
    let fence_re = Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap();
    if let Some(caps) = fence_re.captures(content) {
        if let Ok(v) = serde_json::from_str(&caps[1]) {
            debug!("Extracted JSON from markdown code block");
            return Ok(v);
        }
    }

    // Outermost object span
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str(&content[start..=end]) {
                debug!("Extracted JSON object from content");
                return Ok(v);
            }
        }
    }

    Err(InvokeError::ResponseParse {
        snippet: truncate(content, 200).to_string(),
    })
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
