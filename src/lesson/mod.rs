//! Lesson content data contract.
//!
//! These types are the pass-through contract with the lesson UI layer: the
//! speech pipeline only ever reads `text` + language pairs out of them and
//! never mutates them. They round-trip the provider's camelCase JSON.

mod generator;

pub use generator::{DEFAULT_LESSON_MODEL, LessonBackend, LessonGenerator};

use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// One vocabulary entry of a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    /// The word in the target language
    pub word: String,

    /// Phonetic reading (romaji, pinyin, revised romanization); empty for
    /// languages that do not need one
    #[serde(default)]
    pub reading: Option<String>,

    /// Translation in the learner's context
    pub translation: String,

    /// Explicit English translation
    pub english_translation: String,

    /// Example sentence using the word
    pub example: String,
}

/// A common phrase with usage context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    /// Phrase in the target language
    pub original: String,

    /// Phonetic reading, where the language needs one
    #[serde(default)]
    pub reading: Option<String>,

    /// Translation
    pub translation: String,

    /// When/where the phrase is used
    pub context: String,
}

/// One grammar tip with a highlighted example.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarTip {
    /// Short name of the rule
    pub title: String,

    /// Explanation of the rule
    pub explanation: String,

    /// Example sentence demonstrating the rule
    pub example: String,

    /// Exact substring of `example` that demonstrates the rule
    pub highlight: String,
}

/// A generated lesson bundle for one theme/language pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    /// Lesson title
    pub title: String,

    /// Theme the lesson was generated for; filled in locally, not by the model
    #[serde(default)]
    pub theme: String,

    /// Vocabulary entries (5 per lesson)
    pub vocabulary: Vec<VocabularyItem>,

    /// Common phrases (3 per lesson)
    pub phrases: Vec<Phrase>,

    /// Grammar tips (1 per lesson)
    pub grammar: Vec<GrammarTip>,
}

/// A vocabulary item the learner bookmarked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVocabulary {
    /// The bookmarked entry
    #[serde(flatten)]
    pub item: VocabularyItem,

    /// Unique bookmark id
    pub id: String,

    /// Language the entry belongs to
    pub language_code: LanguageCode,

    /// Unix timestamp (ms) of when the entry was saved
    pub saved_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_round_trip_camel_case() {
        let json = serde_json::json!({
            "title": "At the Café",
            "vocabulary": [{
                "word": "café",
                "reading": "",
                "translation": "coffee",
                "englishTranslation": "coffee",
                "example": "Un café, por favor."
            }],
            "phrases": [{
                "original": "¿Cuánto cuesta?",
                "translation": "How much is it?",
                "context": "Asking for a price"
            }],
            "grammar": [{
                "title": "Gendered nouns",
                "explanation": "Nouns have grammatical gender.",
                "example": "El café está caliente.",
                "highlight": "El café"
            }]
        });

        let lesson: LessonContent = serde_json::from_value(json).unwrap();
        assert_eq!(lesson.vocabulary[0].english_translation, "coffee");
        assert_eq!(lesson.theme, "");
        assert!(lesson.phrases[0].reading.is_none());

        let back = serde_json::to_value(&lesson).unwrap();
        assert_eq!(back["vocabulary"][0]["englishTranslation"], "coffee");
    }

    #[test]
    fn test_saved_vocabulary_flattens_item() {
        let saved = SavedVocabulary {
            item: VocabularyItem {
                word: "pan".into(),
                reading: None,
                translation: "bread".into(),
                english_translation: "bread".into(),
                example: "Quiero pan.".into(),
            },
            id: "abc".into(),
            language_code: LanguageCode::Es,
            saved_at: 1_700_000_000_000,
        };

        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["word"], "pan");
        assert_eq!(json["languageCode"], "es");
        assert_eq!(json["savedAt"], 1_700_000_000_000u64);
    }
}
