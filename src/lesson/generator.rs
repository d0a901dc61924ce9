//! Lesson generation via schema-constrained JSON responses.
//!
//! Unlike the speech path, lesson generation does not retry: a failed lesson
//! blocks the whole session and is surfaced to the caller, who shows the user
//! a retry prompt.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{SpeechError, SpeechResult};
use crate::language::LanguageCode;
use crate::synthesis::messages::{GenerateContentRequest, GenerateContentResponse};
use crate::synthesis::{GeminiClient, SynthesisConfig};

use super::{LessonContent, VocabularyItem};

/// Gemini model used for lesson JSON generation.
pub const DEFAULT_LESSON_MODEL: &str = "gemini-3-flash-preview";

/// Remote backend the lesson generator speaks to.
///
/// Same seam as the speech path's `SpeechBackend`: tests substitute a
/// scripted backend to exercise the parse and error paths without a network.
#[async_trait]
pub trait LessonBackend: Send + Sync {
    /// Issue one schema-constrained generation call.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> SpeechResult<GenerateContentResponse>;
}

#[async_trait]
impl LessonBackend for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> SpeechResult<GenerateContentResponse> {
        self.generate(model, request).await
    }
}

/// Generates structured lessons and extra vocabulary.
pub struct LessonGenerator {
    backend: Arc<dyn LessonBackend>,
    model: String,
}

impl LessonGenerator {
    /// Create a generator using the default lesson model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(GeminiClient::new(SynthesisConfig::new(api_key))),
            model: DEFAULT_LESSON_MODEL.to_string(),
        }
    }

    /// Create a generator over an arbitrary backend (tests, alternate models).
    pub fn with_backend(backend: Arc<dyn LessonBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Generate a full lesson for one theme/language pair.
    pub async fn generate_lesson(
        &self,
        language: LanguageCode,
        theme: &str,
    ) -> SpeechResult<LessonContent> {
        let prompt = lesson_prompt(language, theme);
        let request = GenerateContentRequest::structured_json(&prompt, lesson_schema());
        let response = self.backend.generate_content(&self.model, &request).await?;

        let text = response
            .text()
            .ok_or_else(|| SpeechError::InvalidResponse("lesson response has no text".into()))?;
        let mut lesson: LessonContent = serde_json::from_str(text)
            .map_err(|e| SpeechError::InvalidResponse(format!("lesson JSON: {e}")))?;
        lesson.theme = theme.to_string();
        Ok(lesson)
    }

    /// Generate five more vocabulary items, avoiding already-seen words.
    pub async fn generate_more_vocabulary(
        &self,
        language: LanguageCode,
        theme: &str,
        existing_words: &[String],
    ) -> SpeechResult<Vec<VocabularyItem>> {
        let prompt = format!(
            "Generate 5 more vocabulary items for {} learners for the theme: \"{}\".\n\
             Avoid: {}.\n\
             Return JSON with \"vocabulary\" array.",
            language.display_name(),
            theme,
            existing_words.join(", ")
        );
        let request = GenerateContentRequest::structured_json(&prompt, vocabulary_schema());
        let response = self.backend.generate_content(&self.model, &request).await?;

        let text = response
            .text()
            .ok_or_else(|| SpeechError::InvalidResponse("vocabulary response has no text".into()))?;

        #[derive(serde::Deserialize)]
        struct VocabularyPage {
            vocabulary: Vec<VocabularyItem>,
        }
        let page: VocabularyPage = serde_json::from_str(text)
            .map_err(|e| SpeechError::InvalidResponse(format!("vocabulary JSON: {e}")))?;
        Ok(page.vocabulary)
    }
}

fn lesson_prompt(language: LanguageCode, theme: &str) -> String {
    let reading_clause = if language.needs_reading() {
        "IMPORTANT: You MUST provide a \"reading\" field for EVERY vocabulary item and \
         EVERY phrase.\n\
         - Japanese: Romaji.\n\
         - Chinese: Pinyin.\n\
         - Korean: Revised Romanization."
    } else {
        "Leave \"reading\" empty."
    };

    format!(
        "You are an expert language teacher. Generate a structured language learning lesson \
         for a student learning {target} with the theme: \"{theme}\". \n\
         The response MUST be strictly valid JSON. \n\
         Provide 5 vocabulary items, 3 common phrases, and 1 important grammar tip. \n\
         For vocabulary, include \"translation\" and \"englishTranslation\".\n\
         For the grammar tip, include a \"highlight\" field which is the exact substring of \
         the \"example\" sentence that demonstrates the specific grammar rule.\n\
         \n\
         {reading_clause}",
        target = language.display_name(),
    )
}

fn vocabulary_item_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": {"type": "STRING"},
            "reading": {"type": "STRING"},
            "translation": {"type": "STRING"},
            "englishTranslation": {"type": "STRING"},
            "example": {"type": "STRING"}
        },
        "required": ["word", "translation", "englishTranslation", "example"]
    })
}

fn lesson_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "vocabulary": {"type": "ARRAY", "items": vocabulary_item_schema()},
            "phrases": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": {"type": "STRING"},
                        "reading": {"type": "STRING"},
                        "translation": {"type": "STRING"},
                        "context": {"type": "STRING"}
                    },
                    "required": ["original", "translation", "context"]
                }
            },
            "grammar": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {"type": "STRING"},
                        "explanation": {"type": "STRING"},
                        "example": {"type": "STRING"},
                        "highlight": {"type": "STRING"}
                    },
                    "required": ["title", "explanation", "example", "highlight"]
                }
            }
        },
        "required": ["title", "vocabulary", "phrases", "grammar"]
    })
}

fn vocabulary_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "vocabulary": {"type": "ARRAY", "items": vocabulary_item_schema()}
        },
        "required": ["vocabulary"]
    })
}
