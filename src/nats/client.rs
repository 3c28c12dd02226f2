use super::messages::CaptureControlMessage;
use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

pub const CONTROL_START_SUBJECT: &str = "stt.control.start";
pub const CONTROL_STOP_SUBJECT: &str = "stt.control.stop";
pub const TRANSCRIPT_SUBJECT: &str = "stt.text.>";
pub const ERROR_SUBJECT: &str = "stt.error.>";

/// Connection to the speech-to-text service bus
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Ask the STT service to start recognizing for a capture session
    pub async fn publish_start(&self, session_id: &str, language: &str) -> Result<()> {
        self.publish_control(CONTROL_START_SUBJECT, session_id, Some(language))
            .await
    }

    /// Ask the STT service to stop recognizing for a capture session
    pub async fn publish_stop(&self, session_id: &str) -> Result<()> {
        self.publish_control(CONTROL_STOP_SUBJECT, session_id, None)
            .await
    }

    async fn publish_control(
        &self,
        subject: &'static str,
        session_id: &str,
        language: Option<&str>,
    ) -> Result<()> {
        let message = CaptureControlMessage {
            session_id: session_id.to_string(),
            language: language.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .context("Failed to publish capture control message")?;

        info!("Published {} for capture session {}", subject, session_id);

        Ok(())
    }

    /// Subscribe to transcript messages (partial and final)
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // The STT service publishes to stt.text.partial and stt.text.final;
        // we filter by session_id in the message payload
        self.subscribe(TRANSCRIPT_SUBJECT).await
    }

    /// Subscribe to recognition error reports
    pub async fn subscribe_errors(&self) -> Result<async_nats::Subscriber> {
        self.subscribe(ERROR_SUBJECT).await
    }

    async fn subscribe(&self, subject: &'static str) -> Result<async_nats::Subscriber> {
        info!("Subscribing to {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .with_context(|| format!("Failed to subscribe to {}", subject))?;

        Ok(subscriber)
    }
}
