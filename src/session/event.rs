use crate::capture::{CaptureError, CaptureEvent};
use crate::language::{Language, LanguageSide};
use crate::synthesis::SynthesisError;
use crate::translation::{TranslationError, TranslationRequest, TranslationResponse};

/// Discrete user intent forwarded by the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    StartCapture,
    StopCapture,
    /// Replace the original text; does not translate
    EditText(String),
    /// Translate the current original text
    Submit,
    Speak,
    StopSpeaking,
    ChangeLanguage { side: LanguageSide, code: String },
    DismissError,
}

/// Everything the session reacts to: intents plus adapter outcomes
#[derive(Debug)]
pub enum SessionEvent {
    Intent(Intent),

    /// Event from the capture started under `epoch`
    Capture { epoch: u64, event: CaptureEvent },

    /// The capture adapter refused to start
    CaptureStartFailed { epoch: u64, error: CaptureError },

    /// The capture adapter failed to release the device
    CaptureStopFailed(CaptureError),

    /// The capture started under `epoch` closed its event stream
    CaptureEnded { epoch: u64 },

    TranslationFinished {
        epoch: u64,
        result: Result<TranslationResponse, TranslationError>,
    },

    SpeechFinished {
        utterance: u64,
        result: Result<(), SynthesisError>,
    },
}

impl From<Intent> for SessionEvent {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

/// Side effect requested by a transition, executed by the controller runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartCapture { epoch: u64, language: Language },
    StopCapture,
    Translate { epoch: u64, request: TranslationRequest },
    Speak { utterance: u64, text: String, language: Language },
    StopSpeaking,
}
