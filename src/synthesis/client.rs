//! HTTP client for the Gemini `generateContent` API.

use async_trait::async_trait;

use super::config::SynthesisConfig;
use super::messages::{GEMINI_API_BASE, GenerateContentRequest, GenerateContentResponse};
use crate::error::{SpeechError, SpeechResult};

/// Remote backend the synthesis engine speaks to.
///
/// The engine only needs "one prompt in, one response out"; keeping that
/// behind a trait lets tests substitute a scripted backend and count attempts
/// without any network.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Issue one audio-modality generation call.
    async fn generate_speech(
        &self,
        prompt: &str,
        voice: &str,
    ) -> SpeechResult<GenerateContentResponse>;
}

/// Gemini API client.
pub struct GeminiClient {
    config: SynthesisConfig,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the production API endpoint.
    pub fn new(config: SynthesisConfig) -> Self {
        Self {
            config,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Create a client pointed at an alternate endpoint (local mock server).
    pub fn with_base_url(config: SynthesisConfig, base_url: impl Into<String>) -> Self {
        Self {
            config,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Issue one `generateContent` call against the given model.
    ///
    /// A fresh `reqwest::Client` is constructed per call, so one attempt's
    /// pooled connection state cannot poison the next retry.
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> SpeechResult<GenerateContentResponse> {
        let client = reqwest::Client::new();

        let response = client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| SpeechError::Provider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider(format!("HTTP {status}: {body}")));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("malformed body: {e}")))
    }
}

#[async_trait]
impl SpeechBackend for GeminiClient {
    async fn generate_speech(
        &self,
        prompt: &str,
        voice: &str,
    ) -> SpeechResult<GenerateContentResponse> {
        let request = GenerateContentRequest::speech(prompt, voice);
        self.generate(&self.config.model, &request).await
    }
}
