//! Continuous speech capture
//!
//! A capture adapter wraps an incremental speech-to-text capability. `start` hands back a
//! channel of `CaptureEvent`s carrying the cumulative transcript; `stop` is idempotent.

mod adapter;
mod nats;
mod transcript;

pub use adapter::{CaptureAdapter, CaptureError, CaptureEvent, UnavailableCapture};
pub use nats::NatsCaptureAdapter;
pub use transcript::TranscriptAccumulator;
