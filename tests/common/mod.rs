// Fake adapters shared by the integration tests

#![allow(dead_code)]

use live_translate::capture::{CaptureAdapter, CaptureError, CaptureEvent};
use live_translate::synthesis::{SynthesisAdapter, SynthesisError};
use live_translate::translation::{
    TranslationError, TranslationRequest, TranslationResponse, Translator,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

pub const WAIT: Duration = Duration::from_secs(2);

type Reply = oneshot::Sender<Result<TranslationResponse, TranslationError>>;

/// Translator whose calls stay pending until the test resolves them
#[derive(Clone, Default)]
pub struct ManualTranslator {
    calls: Arc<Mutex<Vec<(TranslationRequest, Option<Reply>)>>>,
}

impl ManualTranslator {
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(req, _)| req.clone())
            .collect()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(WAIT, async {
            while self.calls.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("translator was not called in time");
    }

    pub fn respond(&self, index: usize, result: Result<&str, TranslationError>) {
        let reply = self.calls.lock().unwrap()[index]
            .1
            .take()
            .expect("call already answered");
        let result = result.map(|text| TranslationResponse {
            translated_text: text.to_string(),
            original_text: None,
        });
        let _ = reply.send(result);
    }
}

#[async_trait::async_trait]
impl Translator for ManualTranslator {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResponse, TranslationError> {
        let (tx, rx) = oneshot::channel();
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), Some(tx)));
        rx.await
            .unwrap_or_else(|_| Err(TranslationError::Network("test dropped reply".into())))
    }

    fn name(&self) -> &str {
        "manual"
    }
}

/// Capture adapter driven by the test through `emit`
#[derive(Clone, Default)]
pub struct ScriptedCapture {
    sender: Arc<Mutex<Option<mpsc::Sender<CaptureEvent>>>>,
    pub starts: Arc<Mutex<Vec<String>>>,
    pub stops: Arc<Mutex<usize>>,
}

impl ScriptedCapture {
    pub async fn emit(&self, event: CaptureEvent) {
        let sender = self
            .sender
            .lock()
            .unwrap()
            .clone()
            .expect("capture not started");
        sender.send(event).await.expect("capture receiver dropped");
    }

    pub async fn transcript(&self, text: &str) {
        self.emit(CaptureEvent::Transcript(text.to_string())).await;
    }

    /// Sender of the running capture, kept by tests that emit after stop
    pub fn sender(&self) -> Option<mpsc::Sender<CaptureEvent>> {
        self.sender.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CaptureAdapter for ScriptedCapture {
    async fn start(
        &mut self,
        language_tag: &str,
    ) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel(16);
        *self.sender.lock().unwrap() = Some(tx);
        self.starts.lock().unwrap().push(language_tag.to_string());
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        *self.stops.lock().unwrap() += 1;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        *self.stops.lock().unwrap() < self.starts.lock().unwrap().len()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Synthesis adapter that records utterances and finishes when told to
#[derive(Clone, Default)]
pub struct RecordingSynthesis {
    pub spoken: Arc<Mutex<Vec<(String, String)>>>,
    pub stops: Arc<Mutex<usize>>,
    finish: Arc<Mutex<Vec<oneshot::Sender<Result<(), SynthesisError>>>>>,
}

impl RecordingSynthesis {
    pub async fn wait_for_utterances(&self, count: usize) {
        tokio::time::timeout(WAIT, async {
            while self.spoken.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("synthesis was not called in time");
    }

    pub fn finish(&self, result: Result<(), SynthesisError>) {
        let tx = self.finish.lock().unwrap().remove(0);
        let _ = tx.send(result);
    }
}

#[async_trait::async_trait]
impl SynthesisAdapter for RecordingSynthesis {
    async fn speak(&self, text: &str, language_tag: &str) -> Result<(), SynthesisError> {
        let (tx, rx) = oneshot::channel();
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), language_tag.to_string()));
        self.finish.lock().unwrap().push(tx);
        rx.await.unwrap_or(Err(SynthesisError::Cancelled))
    }

    async fn stop(&self) -> Result<(), SynthesisError> {
        *self.stops.lock().unwrap() += 1;
        for tx in self.finish.lock().unwrap().drain(..) {
            let _ = tx.send(Err(SynthesisError::Cancelled));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
