use crate::error::SessionError;
use crate::language::{self, Language};
use serde::Serialize;

/// The single mutable aggregate of a translation session
///
/// Capture, translation and synthesis are tracked as independent flags because they overlap:
/// transcripts keep arriving while a translation is in flight, and speaking can follow either a
/// manual submit or a captured phrase. Epoch counters tag asynchronous calls so that results of
/// superseded calls can be recognized and dropped.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) source_language: Language,
    pub(super) target_language: Language,
    pub(super) original_text: String,
    pub(super) translated_text: String,
    pub(super) last_error: Option<SessionError>,
    pub(super) capture_epoch: u64,
    pub(super) translation_epoch: u64,
    pub(super) utterance: u64,
    pub(super) capturing: bool,
    pub(super) translating: bool,
    pub(super) speaking: bool,
}

impl Session {
    pub fn new(source_language: Language, target_language: Language) -> Self {
        Self {
            source_language,
            target_language,
            original_text: String::new(),
            translated_text: String::new(),
            last_error: None,
            capture_epoch: 0,
            translation_epoch: 0,
            utterance: 0,
            capturing: false,
            translating: false,
            speaking: false,
        }
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn target_language(&self) -> Language {
        self.target_language
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn capture_epoch(&self) -> u64 {
        self.capture_epoch
    }

    pub fn translation_epoch(&self) -> u64 {
        self.translation_epoch
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn is_translating(&self) -> bool {
        self.translating
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn mode(&self) -> Mode {
        if self.capturing {
            Mode::Listening
        } else if self.translating {
            Mode::Translating
        } else if self.speaking {
            Mode::Speaking
        } else if self.last_error.is_some() {
            Mode::Error
        } else {
            Mode::Idle
        }
    }

    /// Snapshot for rendering
    pub fn view(&self) -> ViewState {
        ViewState {
            mode: self.mode(),
            capturing: self.capturing,
            translating: self.translating,
            speaking: self.speaking,
            source_language: self.source_language.code.to_string(),
            target_language: self.target_language.code.to_string(),
            original_text: self.original_text.clone(),
            translated_text: self.translated_text.clone(),
            last_error: self.last_error.clone(),
            capture_epoch: self.capture_epoch,
            translation_epoch: self.translation_epoch,
            can_start_capture: !self.capturing,
            can_submit: !self.original_text.trim().is_empty() && !self.translating,
            can_speak: !self.translated_text.is_empty() && !self.translating && !self.speaking,
            can_change_language: !self.capturing,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        // Both defaults are catalog entries
        let source = language::find(language::DEFAULT_SOURCE).unwrap_or(language::CATALOG[0]);
        let target = language::find(language::DEFAULT_TARGET).unwrap_or(language::CATALOG[1]);
        Self::new(source, target)
    }
}

/// Dominant activity, derived from the capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Idle,
    Listening,
    Translating,
    Speaking,
    Error,
}

/// Everything a view needs to render the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub mode: Mode,
    pub capturing: bool,
    pub translating: bool,
    pub speaking: bool,
    pub source_language: String,
    pub target_language: String,
    pub original_text: String,
    pub translated_text: String,
    pub last_error: Option<SessionError>,
    pub capture_epoch: u64,
    pub translation_epoch: u64,

    /// Record button enabled
    pub can_start_capture: bool,
    /// Submit button enabled
    pub can_submit: bool,
    /// Speak button enabled
    pub can_speak: bool,
    /// Language selectors enabled
    pub can_change_language: bool,
}
