//! Translation session management
//!
//! This module provides the session controller that coordinates:
//! - Continuous speech capture (transcripts auto-translate)
//! - Remote translation calls, tagged with epochs so stale results are dropped
//! - Speech synthesis of the latest translation
//! - A single view-state for rendering

mod event;
mod runtime;
mod state;
mod transitions;

pub use event::{Command, Intent, SessionEvent};
pub use runtime::{SessionClosed, SessionController, SessionHandle};
pub use state::{Mode, Session, ViewState};
