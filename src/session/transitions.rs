//! Session state machine
//!
//! Every transition mutates the `Session` synchronously and returns the side effects to run.
//! Nothing here awaits; the runtime executes the returned commands and feeds their outcomes back
//! in as `SessionEvent`s tagged with the epoch they were issued under.

use super::event::{Command, Intent, SessionEvent};
use super::state::Session;
use crate::capture::{CaptureError, CaptureEvent};
use crate::error::{ErrorKind, SessionError};
use crate::language::{self, LanguageSide};
use crate::synthesis::SynthesisError;
use crate::translation::{TranslationError, TranslationRequest};
use tracing::{debug, warn};

const EMPTY_SUBMIT_MESSAGE: &str = "Please enter some text to translate.";

impl Session {
    /// Apply one event and return the commands it requests
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::Intent(intent) => self.apply_intent(intent),
            SessionEvent::Capture { epoch, event } => match event {
                CaptureEvent::Transcript(text) => self.on_transcript(epoch, text),
                CaptureEvent::Error { reason, fatal } => self.on_capture_error(epoch, reason, fatal),
            },
            SessionEvent::CaptureStartFailed { epoch, error } => {
                self.on_capture_start_failed(epoch, error)
            }
            SessionEvent::CaptureStopFailed(error) => {
                self.last_error = Some(error.into());
                Vec::new()
            }
            SessionEvent::CaptureEnded { epoch } => self.on_capture_ended(epoch),
            SessionEvent::TranslationFinished { epoch, result } => match result {
                Ok(response) => self.on_translation_succeeded(epoch, response.translated_text),
                Err(error) => self.on_translation_failed(epoch, error),
            },
            SessionEvent::SpeechFinished { utterance, result } => {
                self.on_speech_finished(utterance, result)
            }
        }
    }

    fn apply_intent(&mut self, intent: Intent) -> Vec<Command> {
        match intent {
            Intent::StartCapture => self.start_capture(),
            Intent::StopCapture => self.stop_capture(),
            Intent::EditText(text) => {
                self.edit_text(text);
                Vec::new()
            }
            Intent::Submit => {
                let text = self.original_text.clone();
                self.submit_translation(text)
            }
            Intent::Speak => self.request_speak(),
            Intent::StopSpeaking => self.stop_speaking(),
            Intent::ChangeLanguage { side, code } => {
                self.change_language(side, &code);
                Vec::new()
            }
            Intent::DismissError => {
                self.last_error = None;
                Vec::new()
            }
        }
    }

    pub fn start_capture(&mut self) -> Vec<Command> {
        if self.capturing {
            debug!("Ignoring start capture: already capturing");
            return Vec::new();
        }

        self.capturing = true;
        self.last_error = None;
        self.capture_epoch += 1;

        vec![Command::StartCapture {
            epoch: self.capture_epoch,
            language: self.source_language,
        }]
    }

    pub fn stop_capture(&mut self) -> Vec<Command> {
        if !self.capturing {
            debug!("Ignoring stop capture: not capturing");
            return Vec::new();
        }

        self.capturing = false;
        vec![Command::StopCapture]
    }

    pub fn edit_text(&mut self, text: String) {
        self.original_text = text;
    }

    /// Shared by manual submit and captured transcripts
    pub fn submit_translation(&mut self, text: String) -> Vec<Command> {
        if text.trim().is_empty() {
            self.last_error = Some(SessionError::Validation(EMPTY_SUBMIT_MESSAGE.to_string()));
            return Vec::new();
        }

        self.translation_epoch += 1;
        self.translating = true;

        vec![Command::Translate {
            epoch: self.translation_epoch,
            request: TranslationRequest::new(
                text,
                self.source_language.primary_code(),
                self.target_language.primary_code(),
            ),
        }]
    }

    pub fn request_speak(&mut self) -> Vec<Command> {
        if self.translated_text.is_empty() || self.translating || self.speaking {
            debug!(
                "Ignoring speak request (empty={}, translating={}, speaking={})",
                self.translated_text.is_empty(),
                self.translating,
                self.speaking
            );
            return Vec::new();
        }

        self.speaking = true;
        self.utterance += 1;

        vec![Command::Speak {
            utterance: self.utterance,
            text: self.translated_text.clone(),
            language: self.target_language,
        }]
    }

    pub fn stop_speaking(&mut self) -> Vec<Command> {
        if !self.speaking {
            return Vec::new();
        }

        self.speaking = false;
        vec![Command::StopSpeaking]
    }

    pub fn change_language(&mut self, side: LanguageSide, code: &str) {
        if self.capturing {
            debug!("Ignoring language change while capturing");
            return;
        }

        let Some(lang) = language::find(code) else {
            self.last_error = Some(SessionError::Validation(format!(
                "Unsupported language: {}",
                code
            )));
            return;
        };

        match side {
            LanguageSide::Source => self.source_language = lang,
            LanguageSide::Target => self.target_language = lang,
        }
    }

    fn is_current_capture(&self, epoch: u64) -> bool {
        self.capturing && epoch == self.capture_epoch
    }

    fn on_transcript(&mut self, epoch: u64, text: String) -> Vec<Command> {
        if !self.is_current_capture(epoch) {
            debug!("Dropping transcript from capture epoch {}", epoch);
            return Vec::new();
        }

        self.original_text = text.clone();
        self.submit_translation(text)
    }

    fn on_capture_error(&mut self, epoch: u64, reason: String, fatal: bool) -> Vec<Command> {
        if !self.is_current_capture(epoch) {
            debug!("Dropping capture error from epoch {}: {}", epoch, reason);
            return Vec::new();
        }

        warn!("Speech recognition error (fatal={}): {}", fatal, reason);
        self.last_error = Some(SessionError::Capture(reason));

        if !fatal {
            return Vec::new();
        }

        self.capturing = false;
        vec![Command::StopCapture]
    }

    fn on_capture_start_failed(&mut self, epoch: u64, error: CaptureError) -> Vec<Command> {
        if !self.is_current_capture(epoch) {
            return Vec::new();
        }

        self.capturing = false;
        self.last_error = Some(error.into());
        Vec::new()
    }

    fn on_capture_ended(&mut self, epoch: u64) -> Vec<Command> {
        if !self.is_current_capture(epoch) {
            return Vec::new();
        }

        self.capturing = false;
        vec![Command::StopCapture]
    }

    fn on_translation_succeeded(&mut self, epoch: u64, translated_text: String) -> Vec<Command> {
        if epoch != self.translation_epoch {
            debug!(
                "Dropping stale translation (epoch {}, current {})",
                epoch, self.translation_epoch
            );
            return Vec::new();
        }

        self.translating = false;
        self.translated_text = translated_text;
        self.last_error = None;
        Vec::new()
    }

    fn on_translation_failed(&mut self, epoch: u64, error: TranslationError) -> Vec<Command> {
        if epoch != self.translation_epoch {
            debug!("Dropping stale translation failure (epoch {}): {}", epoch, error);
            return Vec::new();
        }

        warn!("Translation failed: {}", error);
        self.translating = false;
        self.last_error = Some(error.into());
        Vec::new()
    }

    fn on_speech_finished(
        &mut self,
        utterance: u64,
        result: Result<(), SynthesisError>,
    ) -> Vec<Command> {
        if !self.speaking || utterance != self.utterance {
            debug!("Dropping result of utterance {}", utterance);
            return Vec::new();
        }

        self.speaking = false;
        match result {
            Ok(()) => {
                if self.last_error.as_ref().map(SessionError::kind) == Some(ErrorKind::Synthesis) {
                    self.last_error = None;
                }
            }
            Err(error) => {
                warn!("Speech synthesis failed: {}", error);
                self.last_error = Some(error.into());
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::find;
    use crate::session::Mode;
    use crate::translation::TranslationResponse;

    fn translated(epoch: u64, text: &str) -> SessionEvent {
        SessionEvent::TranslationFinished {
            epoch,
            result: Ok(TranslationResponse {
                translated_text: text.to_string(),
                original_text: None,
            }),
        }
    }

    fn transcript(epoch: u64, text: &str) -> SessionEvent {
        SessionEvent::Capture {
            epoch,
            event: CaptureEvent::Transcript(text.to_string()),
        }
    }

    fn translate_epoch(commands: &[Command]) -> u64 {
        match commands {
            [Command::Translate { epoch, .. }] => *epoch,
            other => panic!("expected one translate command, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.source_language().code, "en-US");
        assert_eq!(session.target_language().code, "es-ES");
        assert!(session.original_text().is_empty());
        assert!(session.translated_text().is_empty());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_manual_submit_sends_primary_codes() {
        let mut session = Session::default();
        session.apply(Intent::EditText("Hello".into()).into());
        let commands = session.apply(Intent::Submit.into());

        assert_eq!(
            commands,
            vec![Command::Translate {
                epoch: 1,
                request: TranslationRequest::new("Hello", "en", "es"),
            }]
        );
        assert!(session.is_translating());
        assert_eq!(session.mode(), Mode::Translating);

        session.apply(translated(1, "Hola"));
        assert_eq!(session.translated_text(), "Hola");
        assert!(!session.is_translating());
        assert_eq!(session.mode(), Mode::Idle);
    }

    #[test]
    fn test_edit_text_does_not_translate() {
        let mut session = Session::default();
        let commands = session.apply(Intent::EditText("Hello".into()).into());
        assert!(commands.is_empty());
        assert_eq!(session.original_text(), "Hello");
        assert_eq!(session.translation_epoch(), 0);
    }

    #[test]
    fn test_empty_submit_sets_validation_error() {
        for text in ["", "   \n\t"] {
            let mut session = Session::default();
            session.edit_text(text.to_string());
            let commands = session.apply(Intent::Submit.into());
            assert!(commands.is_empty());
            assert!(!session.is_translating());
            assert_eq!(session.translation_epoch(), 0);
            assert_eq!(
                session.last_error(),
                Some(&SessionError::Validation(EMPTY_SUBMIT_MESSAGE.into()))
            );
        }
    }

    #[test]
    fn test_only_latest_epoch_is_committed() {
        let mut session = Session::default();
        let epochs: Vec<u64> = ["a", "ab", "abc", "abcd"]
            .iter()
            .map(|text| translate_epoch(&session.submit_translation(text.to_string())))
            .collect();
        assert_eq!(epochs, vec![1, 2, 3, 4]);

        // Resolve in an arbitrary order with the latest one in the middle
        session.apply(translated(2, "AB"));
        assert_eq!(session.translated_text(), "");
        assert!(session.is_translating());

        session.apply(translated(4, "ABCD"));
        assert_eq!(session.translated_text(), "ABCD");
        assert!(!session.is_translating());

        session.apply(translated(1, "A"));
        session.apply(translated(3, "ABC"));
        assert_eq!(session.translated_text(), "ABCD");
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut session = Session::default();
        session.submit_translation("He".into());
        session.submit_translation("Hello".into());

        session.apply(SessionEvent::TranslationFinished {
            epoch: 1,
            result: Err(TranslationError::Network("timeout".into())),
        });
        assert!(session.last_error().is_none());
        assert!(session.is_translating());

        session.apply(SessionEvent::TranslationFinished {
            epoch: 2,
            result: Err(TranslationError::Service {
                status: Some(500),
                message: "Translation failed: boom".into(),
            }),
        });
        assert!(!session.is_translating());
        assert_eq!(
            session.last_error(),
            Some(&SessionError::TranslationService("Translation failed: boom".into()))
        );
    }

    #[test]
    fn test_failure_keeps_previous_translation() {
        let mut session = Session::default();
        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));

        session.submit_translation("Goodbye".into());
        session.apply(SessionEvent::TranslationFinished {
            epoch: 2,
            result: Err(TranslationError::Config("API URL is not defined.".into())),
        });
        assert_eq!(session.translated_text(), "Hola");
        assert_eq!(session.mode(), Mode::Error);

        session.submit_translation("Goodbye".into());
        session.apply(translated(3, "Adiós"));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_transcript_auto_translates() {
        let mut session = Session::default();
        let start = session.apply(Intent::StartCapture.into());
        assert_eq!(
            start,
            vec![Command::StartCapture {
                epoch: 1,
                language: find("en-US").unwrap(),
            }]
        );
        assert_eq!(session.mode(), Mode::Listening);

        let commands = session.apply(transcript(1, "hello"));
        assert_eq!(
            commands,
            vec![Command::Translate {
                epoch: 1,
                request: TranslationRequest::new("hello", "en", "es"),
            }]
        );
        assert_eq!(session.original_text(), "hello");

        let commands = session.apply(transcript(1, "hello there"));
        assert_eq!(translate_epoch(&commands), 2);
    }

    #[test]
    fn test_out_of_order_transcript_translations() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        let he = translate_epoch(&session.apply(transcript(1, "He")));
        let hello = translate_epoch(&session.apply(transcript(1, "Hello")));

        session.apply(translated(hello, "Hola"));
        session.apply(translated(he, "Él"));

        assert_eq!(session.translated_text(), "Hola");
        assert_eq!(session.original_text(), "Hello");
    }

    #[test]
    fn test_start_capture_twice_is_noop() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        let before = session.view();
        assert!(session.apply(Intent::StartCapture.into()).is_empty());
        assert_eq!(session.view(), before);
    }

    #[test]
    fn test_start_capture_clears_error() {
        let mut session = Session::default();
        session.submit_translation(" ".into());
        assert!(session.last_error().is_some());
        session.apply(Intent::StartCapture.into());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_transcripts_after_stop_are_dropped() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        assert_eq!(
            session.apply(Intent::StopCapture.into()),
            vec![Command::StopCapture]
        );
        assert!(session.apply(Intent::StopCapture.into()).is_empty());

        assert!(session.apply(transcript(1, "late")).is_empty());
        assert_eq!(session.original_text(), "");

        // A transcript from the first capture arriving during the second is stale too
        session.apply(Intent::StartCapture.into());
        assert!(session.apply(transcript(1, "late")).is_empty());
        assert_eq!(translate_epoch(&session.apply(transcript(2, "new"))), 1);
    }

    #[test]
    fn test_capture_error_is_isolated() {
        let mut session = Session::default();
        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));
        session.apply(Intent::Speak.into());
        session.apply(Intent::StartCapture.into());
        session.submit_translation("Hello again".into());

        let commands = session.apply(SessionEvent::Capture {
            epoch: 1,
            event: CaptureEvent::Error {
                reason: "audio-capture".into(),
                fatal: true,
            },
        });

        assert_eq!(commands, vec![Command::StopCapture]);
        assert!(!session.is_capturing());
        assert!(session.is_translating());
        assert!(session.is_speaking());
        assert_eq!(session.translated_text(), "Hola");
        assert_eq!(
            session.last_error(),
            Some(&SessionError::Capture("audio-capture".into()))
        );
    }

    #[test]
    fn test_non_fatal_capture_error_keeps_listening() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        let commands = session.apply(SessionEvent::Capture {
            epoch: 1,
            event: CaptureEvent::Error {
                reason: "no-speech".into(),
                fatal: false,
            },
        });
        assert!(commands.is_empty());
        assert!(session.is_capturing());
        assert!(session.last_error().is_some());
    }

    #[test]
    fn test_capture_start_failure_leaves_session_usable() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        session.apply(SessionEvent::CaptureStartFailed {
            epoch: 1,
            error: CaptureError::Unsupported("Speech recognition not supported".into()),
        });
        assert!(!session.is_capturing());
        assert_eq!(session.last_error().map(SessionError::kind), Some(ErrorKind::Capture));

        session.apply(Intent::EditText("Hello".into()).into());
        assert_eq!(translate_epoch(&session.apply(Intent::Submit.into())), 1);
    }

    #[test]
    fn test_capture_stream_end_stops_listening() {
        let mut session = Session::default();
        session.apply(Intent::StartCapture.into());
        assert_eq!(
            session.apply(SessionEvent::CaptureEnded { epoch: 1 }),
            vec![Command::StopCapture]
        );
        assert!(!session.is_capturing());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_speak_guards() {
        let mut session = Session::default();
        // Nothing translated yet
        assert!(session.apply(Intent::Speak.into()).is_empty());

        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));

        // Translation in flight
        session.submit_translation("Goodbye".into());
        assert!(session.apply(Intent::Speak.into()).is_empty());
        session.apply(translated(2, "Adiós"));

        let commands = session.apply(Intent::Speak.into());
        assert_eq!(
            commands,
            vec![Command::Speak {
                utterance: 1,
                text: "Adiós".into(),
                language: find("es-ES").unwrap(),
            }]
        );
        assert_eq!(session.mode(), Mode::Speaking);

        // Already speaking
        assert!(session.apply(Intent::Speak.into()).is_empty());

        session.apply(SessionEvent::SpeechFinished {
            utterance: 1,
            result: Ok(()),
        });
        assert!(!session.is_speaking());
    }

    #[test]
    fn test_speech_failure_and_recovery() {
        let mut session = Session::default();
        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));

        session.apply(Intent::Speak.into());
        session.apply(SessionEvent::SpeechFinished {
            utterance: 1,
            result: Err(SynthesisError::Unsupported("no speaker".into())),
        });
        assert!(!session.is_speaking());
        assert_eq!(session.last_error(), Some(&SessionError::Synthesis("no speaker".into())));

        session.apply(Intent::Speak.into());
        session.apply(SessionEvent::SpeechFinished {
            utterance: 2,
            result: Ok(()),
        });
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_stopped_utterance_result_is_dropped() {
        let mut session = Session::default();
        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));

        session.apply(Intent::Speak.into());
        assert_eq!(
            session.apply(Intent::StopSpeaking.into()),
            vec![Command::StopSpeaking]
        );
        session.apply(SessionEvent::SpeechFinished {
            utterance: 1,
            result: Err(SynthesisError::Cancelled),
        });
        assert!(session.last_error().is_none());

        // A late result of the first utterance does not end the second
        session.apply(Intent::Speak.into());
        session.apply(SessionEvent::SpeechFinished {
            utterance: 1,
            result: Ok(()),
        });
        assert!(session.is_speaking());
    }

    #[test]
    fn test_language_change_rules() {
        let mut session = Session::default();
        session.apply(Intent::ChangeLanguage {
            side: LanguageSide::Target,
            code: "fr-FR".into(),
        }
        .into());
        assert_eq!(session.target_language().code, "fr-FR");

        session.apply(Intent::ChangeLanguage {
            side: LanguageSide::Source,
            code: "xx-YY".into(),
        }
        .into());
        assert_eq!(session.source_language().code, "en-US");
        assert!(matches!(session.last_error(), Some(SessionError::Validation(_))));

        session.apply(Intent::StartCapture.into());
        session.apply(Intent::ChangeLanguage {
            side: LanguageSide::Source,
            code: "de-DE".into(),
        }
        .into());
        assert_eq!(session.source_language().code, "en-US");

        session.apply(Intent::StopCapture.into());
        session.apply(Intent::ChangeLanguage {
            side: LanguageSide::Source,
            code: "de-DE".into(),
        }
        .into());
        let commands = session.apply(Intent::StartCapture.into());
        assert_eq!(
            commands,
            vec![Command::StartCapture {
                epoch: 2,
                language: find("de-DE").unwrap(),
            }]
        );
    }

    #[test]
    fn test_language_change_does_not_retranslate() {
        let mut session = Session::default();
        session.submit_translation("Hello".into());
        session.apply(translated(1, "Hola"));
        session.change_language(LanguageSide::Target, "fr-FR");
        assert_eq!(session.translated_text(), "Hola");
        assert_eq!(session.translation_epoch(), 1);

        let commands = session.submit_translation("Hello".into());
        assert_eq!(
            commands,
            vec![Command::Translate {
                epoch: 2,
                request: TranslationRequest::new("Hello", "en", "fr"),
            }]
        );
    }

    #[test]
    fn test_view_hints() {
        let mut session = Session::default();
        let view = session.view();
        assert!(view.can_start_capture);
        assert!(!view.can_submit);
        assert!(!view.can_speak);
        assert!(view.can_change_language);

        session.edit_text("Hello".into());
        assert!(session.view().can_submit);
        session.submit_translation("Hello".into());
        assert!(!session.view().can_submit);
        session.apply(translated(1, "Hola"));
        assert!(session.view().can_speak);

        session.apply(Intent::StartCapture.into());
        let view = session.view();
        assert!(!view.can_start_capture);
        assert!(!view.can_change_language);
    }

    #[test]
    fn test_dismiss_error() {
        let mut session = Session::default();
        session.submit_translation(String::new());
        assert_eq!(session.mode(), Mode::Error);
        session.apply(Intent::DismissError.into());
        assert_eq!(session.mode(), Mode::Idle);
    }
}
