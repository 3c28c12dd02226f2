use super::state::AppState;
use crate::language::{self, LanguageSide};
use crate::session::{Intent, SessionClosed};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EditTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeLanguageRequest {
    /// Full language tag from the catalog (e.g. "fr-FR")
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Apply an intent and answer with the resulting view-state
async fn dispatch(state: &AppState, intent: Intent) -> Response {
    match state.session.dispatch(intent).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(SessionClosed) => {
            error!("Session controller is not running");
            error_response(StatusCode::SERVICE_UNAVAILABLE, SessionClosed.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /languages
/// Language catalog, in display order
pub async fn list_languages() -> impl IntoResponse {
    (StatusCode::OK, Json(language::CATALOG))
}

/// GET /session
/// Current view-state
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.view()))
}

/// POST /session/capture/start
pub async fn start_capture(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::StartCapture).await
}

/// POST /session/capture/stop
pub async fn stop_capture(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::StopCapture).await
}

/// PUT /session/text
/// Replace the original text without translating it
pub async fn edit_text(
    State(state): State<AppState>,
    Json(req): Json<EditTextRequest>,
) -> Response {
    dispatch(&state, Intent::EditText(req.text)).await
}

/// POST /session/translate
/// Translate the current original text
pub async fn submit_translation(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::Submit).await
}

/// POST /session/speak
pub async fn speak(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::Speak).await
}

/// POST /session/speak/stop
pub async fn stop_speaking(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::StopSpeaking).await
}

/// PUT /session/languages/:side
/// Select the source or target language
pub async fn change_language(
    State(state): State<AppState>,
    Path(side): Path<String>,
    Json(req): Json<ChangeLanguageRequest>,
) -> Response {
    let side = match side.as_str() {
        "source" => LanguageSide::Source,
        "target" => LanguageSide::Target,
        other => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Unknown language side: {}", other),
            )
        }
    };

    dispatch(
        &state,
        Intent::ChangeLanguage {
            side,
            code: req.code,
        },
    )
    .await
}

/// DELETE /session/error
/// Dismiss the last error
pub async fn dismiss_error(State(state): State<AppState>) -> Response {
    dispatch(&state, Intent::DismissError).await
}
