//! HTTP intent API for an external view
//!
//! Every route that changes the session answers with the view-state after the intent was
//! applied:
//! - GET /health - Health check
//! - GET /languages - Language catalog
//! - GET /session - Current view-state
//! - POST /session/capture/start, POST /session/capture/stop
//! - PUT /session/text - Edit original text
//! - POST /session/translate - Submit for translation
//! - POST /session/speak, POST /session/speak/stop
//! - PUT /session/languages/:side - Change source/target language
//! - DELETE /session/error - Dismiss last error

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
