//! Remote translation service client
//!
//! One request/response call per translation: `POST {base_url}/translate`. Transport failures,
//! service failures and a missing endpoint are reported as distinct `TranslationError` variants
//! so the session can tell the user what went wrong. No retries happen at this layer.

mod client;
mod messages;

pub use client::{HttpTranslationClient, Translator};
pub use messages::{RemoteLanguage, ServiceErrorBody, TranslationRequest, TranslationResponse};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// No response reached us (timeout, DNS, connection refused)
    #[error("network error: {0}")]
    Network(String),

    /// The service responded with a non-success status or an unreadable body
    #[error("service error: {message}")]
    Service { status: Option<u16>, message: String },

    /// The endpoint is not configured
    #[error("configuration error: {0}")]
    Config(String),
}
