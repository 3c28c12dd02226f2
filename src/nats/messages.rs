use serde::{Deserialize, Serialize};

/// Start/stop request published to the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureControlMessage {
    pub session_id: String,
    /// Full language tag to recognize (start only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub timestamp: String, // RFC3339 timestamp
}

/// Transcript message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Recognition failure reported by the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognitionErrorMessage {
    pub session_id: String,
    pub reason: String,
    /// Fatal errors end the capture session; others are informational (e.g. "no-speech")
    #[serde(default = "default_fatal")]
    pub fatal: bool,
}

fn default_fatal() -> bool {
    true
}
