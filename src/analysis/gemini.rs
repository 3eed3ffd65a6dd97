//! Gemini `generateContent` backend.
//!
//! Credentials are resolved and the HTTP agent is built on every request, so
//! a changed API key takes effect without restarting the session.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::BackendError;
use super::{AnalysisRequest, VisionBackend};
use crate::domain::SYSTEM_INSTRUCTION;

/// Default REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Where the API key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeySource {
    /// Environment variable checked first
    pub env_var: String,
    /// Literal key used when the variable is unset or empty
    pub fallback: Option<String>,
}

impl ApiKeySource {
    pub fn from_env(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.fallback = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    /// Current key, if any
    pub fn resolve(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .or_else(|| self.fallback.clone())
    }
}

/// Request tuning
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiOptions {
    pub endpoint: String,
    pub temperature: f32,
    /// Thinking budget for `gemini-3` models
    pub thinking_budget: u32,
    /// Output cap for all other models
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.7,
            thinking_budget: 16384,
            max_output_tokens: 1024,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Backend talking to the Gemini REST API
pub struct GeminiBackend {
    key: ApiKeySource,
    options: GeminiOptions,
}

impl GeminiBackend {
    pub fn new(key: ApiKeySource, options: GeminiOptions) -> Self {
        Self { key, options }
    }

    fn generation_config(&self, model: &str) -> GenerationConfig {
        if model.contains("gemini-3") {
            GenerationConfig {
                temperature: self.options.temperature,
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: self.options.thinking_budget,
                }),
                max_output_tokens: None,
            }
        } else {
            GenerationConfig {
                temperature: self.options.temperature,
                thinking_config: None,
                max_output_tokens: Some(self.options.max_output_tokens),
            }
        }
    }

    fn build_body(&self, model: &str, request: &AnalysisRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.image.mime_type().to_string(),
                            data: request.image.to_base64(),
                        },
                    },
                    Part::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
            generation_config: self.generation_config(model),
        }
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        request: &AnalysisRequest,
    ) -> Result<Option<String>, BackendError> {
        let Some(api_key) = self.key.resolve() else {
            return Err(BackendError::status(
                401,
                format!("API key not configured (set {})", self.key.env_var),
            ));
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.options.endpoint.trim_end_matches('/'),
            model
        );
        let body = self.build_body(model, request);
        let timeout = self.options.timeout;

        debug!("POST {} ({} image bytes)", url, request.image.len());

        tokio::task::spawn_blocking(move || post_generate(&url, &api_key, timeout, &body))
            .await
            .map_err(|e| BackendError::transport(format!("Request task failed: {}", e)))?
    }
}

fn post_generate(
    url: &str,
    api_key: &str,
    timeout: Duration,
    body: &GenerateContentRequest,
) -> Result<Option<String>, BackendError> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();

    match agent
        .post(url)
        .set("x-goog-api-key", api_key)
        .set("Content-Type", "application/json")
        .send_json(body)
    {
        Ok(response) => {
            let parsed: GenerateContentResponse = response
                .into_json()
                .map_err(|e| BackendError::transport(format!("Failed to parse response: {}", e)))?;
            Ok(parsed.text())
        }
        Err(ureq::Error::Status(code, response)) => {
            let raw = response.into_string().unwrap_or_default();
            Err(BackendError::status(code, api_error_message(&raw)))
        }
        Err(ureq::Error::Transport(transport)) => Err(BackendError::transport(transport.to_string())),
    }
}

/// Extract `error.message` from an error body, falling back to the raw body
fn api_error_message(raw: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(raw)
        .ok()
        .map(|body| match body.error.status {
            Some(status) => format!("{} ({})", body.error.message, status.replace('_', " ")),
            None => body.error.message,
        })
        .unwrap_or_else(|| raw.trim().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated non-thought text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::QualityTier;
    use crate::capture::Frame;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(
            ApiKeySource::from_env("VISIONAI_TEST_UNSET_KEY"),
            GeminiOptions::default(),
        )
    }

    #[test]
    fn test_gemini3_models_use_thinking_budget() {
        let config = serde_json::to_value(backend().generation_config("gemini-3-flash-preview")).unwrap();
        assert_eq!(config["thinkingConfig"]["thinkingBudget"], 16384);
        assert!(config.get("maxOutputTokens").is_none());

        let config = serde_json::to_value(backend().generation_config("gemini-2.0-flash")).unwrap();
        assert_eq!(config["maxOutputTokens"], 1024);
        assert!(config.get("thinkingConfig").is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let request = AnalysisRequest::new(
            Frame::new(vec![0xff, 0xd8, 0xff, 0x00]),
            "Describe",
            QualityTier::Fast,
        );
        let body = serde_json::to_value(backend().build_body("gemini-2.0-flash", &request)).unwrap();

        assert!(body["systemInstruction"].get("role").is_none());
        let parts = &body["contents"][0]["parts"];
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/AA==");
        assert_eq!(parts[1]["text"], "Describe");
    }

    #[test]
    fn test_response_text_skips_thoughts() {
        let json = r#"{"candidates":[{"content":{"parts":[
            {"text":"thinking...","thought":true},
            {"text":"A red door."}
        ]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("A red door."));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_api_error_message() {
        let raw = r#"{"error":{"code":429,"message":"Quota exceeded for metric","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            api_error_message(raw),
            "Quota exceeded for metric (RESOURCE EXHAUSTED)"
        );
        assert_eq!(api_error_message("gateway down\n"), "gateway down");
    }

    #[tokio::test]
    async fn test_missing_key_is_a_config_error() {
        let request = AnalysisRequest::new(Frame::new(vec![1, 2, 3]), "Describe", QualityTier::Fast);
        let err = backend().generate("gemini-2.0-flash", &request).await.unwrap_err();
        assert_eq!(err.status, Some(401));
        assert_eq!(
            crate::analysis::FailureKind::of(&err),
            crate::analysis::FailureKind::Config
        );
    }
}
