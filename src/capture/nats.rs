use super::adapter::{CaptureAdapter, CaptureError, CaptureEvent};
use super::transcript::TranscriptAccumulator;
use crate::nats::{NatsClient, RecognitionErrorMessage, TranscriptMessage};
use anyhow::Result;
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Capture adapter backed by an external STT service reachable over NATS
///
/// The service owns the microphone; this adapter only asks it to start/stop recognizing for a
/// capture session id and turns its transcript messages into cumulative text.
pub struct NatsCaptureAdapter {
    client: Arc<NatsClient>,
    session_id: Option<String>,
    task: Option<JoinHandle<()>>,
}

enum Incoming {
    Transcript(async_nats::Message),
    Error(async_nats::Message),
}

impl NatsCaptureAdapter {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = NatsClient::connect(url).await?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn new(client: Arc<NatsClient>) -> Self {
        Self {
            client,
            session_id: None,
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl CaptureAdapter for NatsCaptureAdapter {
    async fn start(
        &mut self,
        language_tag: &str,
    ) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        if self.session_id.is_some() {
            return Err(CaptureError::AlreadyCapturing);
        }

        let session_id = format!("capture-{}", uuid::Uuid::new_v4());
        info!("Starting speech capture {} ({})", session_id, language_tag);

        // Subscribe before asking for recognition so no early transcript is missed
        let transcripts = self
            .client
            .subscribe_transcripts()
            .await
            .map_err(|e| CaptureError::Runtime(format!("{:#}", e)))?;
        let errors = self
            .client
            .subscribe_errors()
            .await
            .map_err(|e| CaptureError::Runtime(format!("{:#}", e)))?;

        self.client
            .publish_start(&session_id, language_tag)
            .await
            .map_err(|e| CaptureError::Runtime(format!("{:#}", e)))?;

        let (tx, rx) = mpsc::channel(64);
        let task_session_id = session_id.clone();

        let task = tokio::spawn(async move {
            info!("Transcript receiving task started");

            let mut incoming = Box::pin(futures::stream::select(
                transcripts.map(Incoming::Transcript),
                errors.map(Incoming::Error),
            ));
            let mut transcript = TranscriptAccumulator::new();

            while let Some(item) = incoming.next().await {
                let event = match item {
                    Incoming::Transcript(msg) => {
                        match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                            Ok(message) if message.session_id == task_session_id => {
                                CaptureEvent::Transcript(
                                    transcript.push(&message.text, message.partial),
                                )
                            }
                            Ok(_) => continue,
                            Err(e) => {
                                warn!("Failed to parse transcript message: {}", e);
                                continue;
                            }
                        }
                    }
                    Incoming::Error(msg) => {
                        match serde_json::from_slice::<RecognitionErrorMessage>(&msg.payload) {
                            Ok(message) if message.session_id == task_session_id => {
                                CaptureEvent::Error {
                                    reason: message.reason,
                                    fatal: message.fatal,
                                }
                            }
                            Ok(_) => continue,
                            Err(e) => {
                                warn!("Failed to parse recognition error message: {}", e);
                                continue;
                            }
                        }
                    }
                };

                let fatal = matches!(event, CaptureEvent::Error { fatal: true, .. });
                if tx.send(event).await.is_err() || fatal {
                    break;
                }
            }

            info!("Transcript receiving task stopped");
        });

        self.session_id = Some(session_id);
        self.task = Some(task);

        info!("Speech capture started successfully");

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };

        info!("Stopping speech capture {}", session_id);

        if let Some(task) = self.task.take() {
            task.abort();
        }

        if let Err(e) = self.client.publish_stop(&session_id).await {
            error!("Failed to stop speech capture: {:#}", e);
            return Err(CaptureError::Runtime(format!("{:#}", e)));
        }

        info!("Speech capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.session_id.is_some()
    }

    fn name(&self) -> &str {
        "NATS speech-to-text"
    }
}
