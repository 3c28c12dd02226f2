use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/languages", get(handlers::list_languages))
        // Session view-state
        .route("/session", get(handlers::get_session))
        // Capture control
        .route("/session/capture/start", post(handlers::start_capture))
        .route("/session/capture/stop", post(handlers::stop_capture))
        // Text and translation
        .route("/session/text", put(handlers::edit_text))
        .route("/session/translate", post(handlers::submit_translation))
        // Speech
        .route("/session/speak", post(handlers::speak))
        .route("/session/speak/stop", post(handlers::stop_speaking))
        // Languages and errors
        .route("/session/languages/:side", put(handlers::change_language))
        .route("/session/error", delete(handlers::dismiss_error))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
