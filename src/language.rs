use serde::{Deserialize, Serialize};

/// A language the session can capture from or translate into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Full language tag (e.g. "en-US"), used for capture and synthesis
    pub code: &'static str,
    /// Human readable name shown by the view
    pub display_name: &'static str,
}

impl Language {
    /// Bare primary subtag ("en" for "en-US"), which is what the translation service expects
    pub fn primary_code(&self) -> &'static str {
        primary_subtag(self.code)
    }
}

/// Known languages, in the order the view lists them
pub const CATALOG: &[Language] = &[
    Language { code: "en-US", display_name: "English (US)" },
    Language { code: "es-ES", display_name: "Spanish (Spain)" },
    Language { code: "fr-FR", display_name: "French (France)" },
    Language { code: "de-DE", display_name: "German (Germany)" },
    Language { code: "zh-CN", display_name: "Chinese (Simplified)" },
    Language { code: "ar-SA", display_name: "Arabic (Saudi Arabia)" },
    Language { code: "hi-IN", display_name: "Hindi (India)" },
    Language { code: "ja-JP", display_name: "Japanese (Japan)" },
    Language { code: "ru-RU", display_name: "Russian (Russia)" },
    Language { code: "pt-BR", display_name: "Portuguese (Brazil)" },
];

pub const DEFAULT_SOURCE: &str = "en-US";
pub const DEFAULT_TARGET: &str = "es-ES";

/// Look up a catalog entry by its full tag
pub fn find(code: &str) -> Option<Language> {
    CATALOG.iter().copied().find(|lang| lang.code == code)
}

/// Primary subtag of any language tag
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Which side of the translation a language selection applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSide {
    Source,
    Target,
}
