//! Language codes supported by the lesson app and their voice mapping.
//!
//! Every language maps to one of the Gemini prebuilt speaker personas. An
//! unknown code string parses to [`LanguageCode::En`], so the pipeline always
//! ends up with a known voice.

use serde::{Deserialize, Serialize};

/// Voice used when a language has no dedicated mapping.
pub const DEFAULT_VOICE: &str = "Kore";

/// Languages the lesson app can teach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
    /// French
    Fr,
    /// German
    De,
    /// Japanese
    Ja,
    /// Mandarin Chinese
    Zh,
    /// Korean
    Ko,
    /// Italian
    It,
    /// Portuguese
    Pt,
    /// Russian
    Ru,
}

impl LanguageCode {
    /// All supported languages, in display order.
    pub const ALL: [LanguageCode; 10] = [
        Self::En,
        Self::Es,
        Self::Fr,
        Self::De,
        Self::Ja,
        Self::Zh,
        Self::Ko,
        Self::It,
        Self::Pt,
        Self::Ru,
    ];

    /// Convert to the ISO 639-1 code used on the wire.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Ja => "ja",
            Self::Zh => "zh",
            Self::Ko => "ko",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ru => "ru",
        }
    }

    /// English display name, used when prompting the lesson model.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
            Self::Ja => "Japanese",
            Self::Zh => "Mandarin Chinese",
            Self::Ko => "Korean",
            Self::It => "Italian",
            Self::Pt => "Portuguese",
            Self::Ru => "Russian",
        }
    }

    /// Prebuilt Gemini voice persona for this language.
    pub fn voice(&self) -> &'static str {
        match self {
            Self::En | Self::Ja | Self::Ko => "Kore",
            Self::Es | Self::De | Self::It => "Puck",
            Self::Fr | Self::Zh | Self::Pt => "Charon",
            Self::Ru => "Fenrir",
        }
    }

    /// Whether vocabulary/phrases in this language need a phonetic reading
    /// (romaji, pinyin, revised romanization).
    pub fn needs_reading(&self) -> bool {
        matches!(self, Self::Ja | Self::Zh | Self::Ko)
    }

    /// Parse from string, with fallback to the default language.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "en" => Self::En,
            "es" => Self::Es,
            "fr" => Self::Fr,
            "de" => Self::De,
            "ja" => Self::Ja,
            "zh" => Self::Zh,
            "ko" => Self::Ko,
            "it" => Self::It,
            "pt" => Self::Pt,
            "ru" => Self::Ru,
            _ => Self::default(),
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
