use serde::{Deserialize, Serialize};

/// Body of `POST /translate`
///
/// Language fields carry bare primary subtags ("en"), never full tags ("en-US").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    /// Ask the service for medical terminology handling (service default when absent)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_medical: Option<bool>,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            is_medical: None,
        }
    }
}

/// Successful response of `POST /translate`
///
/// The service echoes the request fields back; only `translated_text` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

/// Failure body the service sends with non-success statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

/// Entry of `GET /languages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLanguage {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub native_name: Option<String>,
}
