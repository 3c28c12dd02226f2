use super::messages::{RemoteLanguage, ServiceErrorBody, TranslationRequest, TranslationResponse};
use super::TranslationError;
use crate::config::TranslationConfig;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Translation capability used by the session controller
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate one piece of text
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> std::result::Result<TranslationResponse, TranslationError>;

    /// Get translator name for logging
    fn name(&self) -> &str;
}

/// HTTP client for the translation service
pub struct HttpTranslationClient {
    client: reqwest::Client,
    base_url: Option<String>,
    medical: Option<bool>,
}

impl HttpTranslationClient {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        match &base_url {
            Some(url) => info!("Translation service endpoint: {}", url),
            None => warn!("Translation service URL is not configured; translations will fail"),
        }

        Ok(Self {
            client,
            base_url,
            medical: config.medical,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn endpoint(&self, path: &str) -> std::result::Result<String, TranslationError> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base, path))
            .ok_or_else(|| TranslationError::Config("API URL is not defined.".to_string()))
    }

    /// List the languages the service advertises (`GET /languages`)
    pub async fn languages(&self) -> std::result::Result<Vec<RemoteLanguage>, TranslationError> {
        let url = self.endpoint("/languages")?;

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslationError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<Vec<RemoteLanguage>>()
            .await
            .map_err(|e| TranslationError::Service {
                status: None,
                message: format!("Failed to parse language list: {}", e),
            })
    }
}

#[async_trait::async_trait]
impl Translator for HttpTranslationClient {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> std::result::Result<TranslationResponse, TranslationError> {
        let url = self.endpoint("/translate")?;

        let mut body = request.clone();
        if body.is_medical.is_none() {
            body.is_medical = self.medical;
        }

        debug!(
            "Sending translation request to {} ({} -> {}, {} chars)",
            url,
            body.source_language,
            body.target_language,
            body.text.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<TranslationResponse>()
            .await
            .map_err(|e| TranslationError::Service {
                status: None,
                message: format!("Failed to parse translation response: {}", e),
            })
    }

    fn name(&self) -> &str {
        "HTTP translation service"
    }
}

/// Turn a non-success response into a `Service` error, preferring the server's `error` field
async fn check_status(
    response: reqwest::Response,
) -> std::result::Result<reqwest::Response, TranslationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) => format!("Request failed with status code {}", status.as_u16()),
    };

    warn!("Translation service returned {}: {}", status, message);

    Err(TranslationError::Service {
        status: Some(status.as_u16()),
        message,
    })
}
