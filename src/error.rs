//! User-visible error taxonomy of a translation session
//!
//! Leaf adapters report their own typed errors (`CaptureError`, `SynthesisError`,
//! `TranslationError`); the controller maps each of them into a `SessionError` that is stored as
//! the session's `last_error` and rendered by the view.

use crate::capture::CaptureError;
use crate::synthesis::SynthesisError;
use crate::translation::TranslationError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SessionError {
    /// Speech capture is unsupported or failed at runtime
    #[error("Speech recognition error: {0}")]
    Capture(String),

    /// Speech synthesis is unsupported or failed at runtime
    #[error("Text-to-speech failed: {0}")]
    Synthesis(String),

    /// The translation request never reached the service
    #[error("Translation error: {0}")]
    TranslationNetwork(String),

    /// The translation service answered with a failure
    #[error("Translation error: {0}")]
    TranslationService(String),

    /// The translation endpoint is not configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// The user asked for something the session cannot do with its current input
    #[error("{0}")]
    Validation(String),
}

/// Coarse category of a `SessionError`, used to clear errors on the next success of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Capture,
    Synthesis,
    Translation,
    Validation,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Capture(_) => ErrorKind::Capture,
            Self::Synthesis(_) => ErrorKind::Synthesis,
            Self::TranslationNetwork(_) | Self::TranslationService(_) | Self::Config(_) => {
                ErrorKind::Translation
            }
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<CaptureError> for SessionError {
    fn from(err: CaptureError) -> Self {
        Self::Capture(err.to_string())
    }
}

impl From<SynthesisError> for SessionError {
    fn from(err: SynthesisError) -> Self {
        Self::Synthesis(err.to_string())
    }
}

impl From<TranslationError> for SessionError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::Network(msg) => Self::TranslationNetwork(msg),
            TranslationError::Service { message, .. } => Self::TranslationService(message),
            TranslationError::Config(msg) => Self::Config(msg),
        }
    }
}
