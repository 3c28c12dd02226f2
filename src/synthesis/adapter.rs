use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("{0}")]
    Unsupported(String),

    #[error("nothing to speak")]
    EmptyText,

    #[error("another utterance is already playing")]
    Busy,

    #[error("utterance was stopped")]
    Cancelled,

    #[error("{0}")]
    Runtime(String),
}

/// Speech synthesis backend trait
#[async_trait::async_trait]
pub trait SynthesisAdapter: Send + Sync {
    /// Speak `text` in `language_tag`, resolving when playback ends
    async fn speak(&self, text: &str, language_tag: &str) -> Result<(), SynthesisError>;

    /// Interrupt the current utterance, if any
    async fn stop(&self) -> Result<(), SynthesisError>;

    /// Get adapter name for logging
    fn name(&self) -> &str;
}

/// Synthesis adapter for environments without text-to-speech
pub struct UnavailableSynthesis {
    reason: String,
}

impl UnavailableSynthesis {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableSynthesis {
    fn default() -> Self {
        Self::new("Text-to-speech not supported in this environment.")
    }
}

#[async_trait::async_trait]
impl SynthesisAdapter for UnavailableSynthesis {
    async fn speak(&self, _text: &str, _language_tag: &str) -> Result<(), SynthesisError> {
        Err(SynthesisError::Unsupported(self.reason.clone()))
    }

    async fn stop(&self) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
