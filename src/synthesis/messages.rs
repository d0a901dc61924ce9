//! Gemini `generateContent` API message types.
//!
//! Request and response structures for the one RPC this crate speaks:
//! "generate content for a prompt", parameterized for either an audio
//! response (speech synthesis) or a schema-constrained JSON response
//! (lesson generation).

use serde::{Deserialize, Serialize};

/// Base URL for the Gemini generative language API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// Request Types
// =============================================================================

/// Top-level `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Prompt contents (a single user turn for this crate)
    pub contents: Vec<Content>,

    /// Generation parameters (modalities, voice, response schema)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Build a speech synthesis request for one prompt and voice persona.
    pub fn speech(prompt: &str, voice: &str) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                }),
                response_mime_type: None,
                response_schema: None,
            }),
        }
    }

    /// Build a request for a schema-constrained JSON response.
    pub fn structured_json(prompt: &str, schema: serde_json::Value) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: Vec::new(),
                speech_config: None,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
            }),
        }
    }
}

/// One turn of content, a list of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// Ordered message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A content turn holding a single text part.
    pub fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

/// A single message part: text or inline binary data, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline base64-encoded binary content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64-encoded blob embedded in a response part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload (e.g. `audio/L16;codec=pcm;rate=24000`)
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Base64-encoded payload
    pub data: String,
}

/// Generation parameters controlling modality and output shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested response modalities (e.g. `["AUDIO"]`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<String>,

    /// Speech synthesis parameters, required for audio responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,

    /// Response MIME type (e.g. `application/json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// JSON schema the response must validate against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// Speech output configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection
    pub voice_config: VoiceConfig,
}

/// Voice selection wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice persona selection
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// Selection of one of the provider's prebuilt speaker personas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice persona name (e.g. "Kore", "Puck")
    pub voice_name: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// Top-level `generateContent` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate completions; zero or one for this crate's requests
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when the model produced nothing
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped, populated when content is absent or truncated
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Base64 audio payload from the first candidate, if any part carries one.
    pub fn inline_audio(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .map(|blob| blob.data.as_str())
    }

    /// Text of the first candidate's first text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
    }

    /// Finish reason of the first candidate, if reported.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}
