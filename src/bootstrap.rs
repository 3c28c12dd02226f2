//! Wiring of the session controller from configuration
//!
//! Missing or unreachable capabilities never abort startup: they are replaced by unavailable
//! adapters so the session stays usable for manual text entry.

use crate::capture::{CaptureAdapter, NatsCaptureAdapter, UnavailableCapture};
use crate::config::Config;
use crate::language;
use crate::session::{Session, SessionController};
use crate::synthesis::{CommandSynthesizer, SynthesisAdapter, UnavailableSynthesis};
use crate::translation::HttpTranslationClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn build_controller(config: &Config) -> Result<SessionController> {
    let source = language::find(&config.session.source_language)
        .with_context(|| format!("Unsupported language: {}", config.session.source_language))?;
    let target = language::find(&config.session.target_language)
        .with_context(|| format!("Unsupported language: {}", config.session.target_language))?;

    let translator = Arc::new(
        HttpTranslationClient::new(&config.translation)
            .context("Failed to create translation client")?,
    );
    check_service_languages(&translator).await;

    let capture = build_capture(config).await;
    let synthesis = build_synthesis(config);

    Ok(SessionController::new(
        Session::new(source, target),
        capture,
        synthesis,
        translator,
    ))
}

async fn build_capture(config: &Config) -> Box<dyn CaptureAdapter> {
    let Some(url) = config.capture.nats_url.as_deref() else {
        info!("No speech-to-text service configured; capture disabled");
        return Box::new(UnavailableCapture::default());
    };

    match NatsCaptureAdapter::connect(url).await {
        Ok(adapter) => Box::new(adapter),
        Err(e) => {
            warn!("Speech capture unavailable: {:#}", e);
            Box::new(UnavailableCapture::new(format!(
                "Speech recognition service unreachable at {}",
                url
            )))
        }
    }
}

fn build_synthesis(config: &Config) -> Arc<dyn SynthesisAdapter> {
    match CommandSynthesizer::from_config(&config.synthesis) {
        Some(synth) => {
            info!("Speech synthesis via {}", synth.name());
            Arc::new(synth)
        }
        None => {
            info!("No text-to-speech program configured; synthesis disabled");
            Arc::new(UnavailableSynthesis::default())
        }
    }
}

/// Warn about catalog languages the translation service does not list
async fn check_service_languages(client: &HttpTranslationClient) {
    if client.base_url().is_none() {
        return;
    }

    match client.languages().await {
        Ok(remote) => {
            let missing: Vec<&str> = language::CATALOG
                .iter()
                .map(|lang| lang.primary_code())
                .filter(|code| !remote.iter().any(|r| r.code == *code))
                .collect();
            if missing.is_empty() {
                info!("Translation service supports all {} languages", language::CATALOG.len());
            } else {
                warn!("Translation service does not list: {}", missing.join(", "));
            }
        }
        Err(e) => warn!("Could not query translation service languages: {}", e),
    }
}
