pub mod bootstrap;
pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod nats;
pub mod session;
pub mod synthesis;
pub mod translation;

pub use capture::{CaptureAdapter, CaptureError, CaptureEvent, NatsCaptureAdapter};
pub use config::Config;
pub use error::SessionError;
pub use http::{create_router, AppState};
pub use language::{Language, LanguageSide};
pub use session::{Intent, Mode, Session, SessionController, SessionHandle, ViewState};
pub use synthesis::{CommandSynthesizer, SynthesisAdapter, SynthesisError};
pub use translation::{HttpTranslationClient, TranslationError, TranslationRequest, Translator};
