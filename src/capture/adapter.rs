use thiserror::Error;
use tokio::sync::mpsc;

/// Event emitted by a running capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Cumulative transcript so far (not a delta)
    Transcript(String),
    /// Recognition problem; fatal errors end the capture
    Error { reason: String, fatal: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The capability does not exist in this environment
    #[error("{0}")]
    Unsupported(String),

    /// `start` while a capture is already running
    #[error("capture already running")]
    AlreadyCapturing,

    /// The capability failed while starting or stopping
    #[error("{0}")]
    Runtime(String),
}

/// Speech capture backend trait
///
/// Implementations:
/// - NATS: control messages to an external STT service, transcripts back over subjects
/// - Unavailable: stand-in when no capture capability is configured
#[async_trait::async_trait]
pub trait CaptureAdapter: Send + Sync {
    /// Start capturing speech in `language_tag`
    ///
    /// Returns a channel receiver that will receive capture events
    async fn start(&mut self, language_tag: &str)
        -> Result<mpsc::Receiver<CaptureEvent>, CaptureError>;

    /// Stop capturing (no-op when not capturing)
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if adapter is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get adapter name for logging
    fn name(&self) -> &str;
}

/// Capture adapter for environments without speech recognition
pub struct UnavailableCapture {
    reason: String,
}

impl UnavailableCapture {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableCapture {
    fn default() -> Self {
        Self::new("Speech recognition not supported in this environment.")
    }
}

#[async_trait::async_trait]
impl CaptureAdapter for UnavailableCapture {
    async fn start(
        &mut self,
        _language_tag: &str,
    ) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        Err(CaptureError::Unsupported(self.reason.clone()))
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
