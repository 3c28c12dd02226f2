//! Speech synthesis
//!
//! A synthesis adapter speaks one utterance at a time. `speak` resolves once the utterance has
//! finished (or failed), which is the single terminal event the session waits for.

mod adapter;
mod command;

pub use adapter::{SynthesisAdapter, SynthesisError, UnavailableSynthesis};
pub use command::CommandSynthesizer;
