use super::event::{Command, Intent, SessionEvent};
use super::state::{Session, ViewState};
use crate::capture::{CaptureAdapter, CaptureEvent};
use crate::synthesis::SynthesisAdapter;
use crate::translation::Translator;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const MESSAGE_BUFFER: usize = 256;

/// The controller loop is gone (shut down or panicked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session controller is not running")]
pub struct SessionClosed;

enum Message {
    Intent {
        intent: Intent,
        reply: Option<oneshot::Sender<ViewState>>,
    },
    Event(SessionEvent),
    Shutdown,
}

/// Drives a `Session` from one task
///
/// Intents and adapter outcomes are queued on a single channel and applied one at a time, so
/// the session has exactly one writer. Translation and speech run in spawned tasks that report
/// back through the same channel; capture events are forwarded from the adapter's receiver.
/// The loop ends on `shutdown` or once every `SessionHandle` is dropped.
pub struct SessionController {
    session: Session,
    capture: Box<dyn CaptureAdapter>,
    synthesis: Arc<dyn SynthesisAdapter>,
    translator: Arc<dyn Translator>,
    /// Strong sender handed to handles until the loop starts
    initial_tx: Option<mpsc::Sender<Message>>,
    tx: mpsc::WeakSender<Message>,
    rx: mpsc::Receiver<Message>,
    view_tx: watch::Sender<ViewState>,
    capture_forwarder: Option<JoinHandle<()>>,
}

/// Cloneable entry point for views: send intents, read the current view-state
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Message>,
    view_rx: watch::Receiver<ViewState>,
}

impl SessionController {
    pub fn new(
        session: Session,
        capture: Box<dyn CaptureAdapter>,
        synthesis: Arc<dyn SynthesisAdapter>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);
        let (view_tx, _) = watch::channel(session.view());

        info!(
            "Session controller created (capture: {}, synthesis: {}, translation: {})",
            capture.name(),
            synthesis.name(),
            translator.name()
        );

        Self {
            session,
            capture,
            synthesis,
            translator,
            tx: tx.downgrade(),
            initial_tx: Some(tx),
            rx,
            view_tx,
            capture_forwarder: None,
        }
    }

    /// Handles must be taken before the controller runs
    pub fn handle(&self) -> SessionHandle {
        let tx = match &self.initial_tx {
            Some(tx) => tx.clone(),
            None => {
                let (tx, _) = mpsc::channel(1);
                tx
            }
        };
        SessionHandle {
            tx,
            view_rx: self.view_tx.subscribe(),
        }
    }

    /// Run the controller on its own task
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let handle = self.handle();
        let task = tokio::spawn(self.run());
        (handle, task)
    }

    pub async fn run(mut self) {
        info!("Session controller started");
        self.initial_tx = None;

        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Intent { intent, reply } => {
                    debug!("Intent: {:?}", intent);
                    self.process(SessionEvent::Intent(intent)).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(self.session.view());
                    }
                }
                Message::Event(event) => self.process(event).await,
                Message::Shutdown => break,
            }
        }

        self.release().await;
        info!("Session controller stopped");
    }

    async fn process(&mut self, event: SessionEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            for command in self.session.apply(event) {
                if let Some(follow_up) = self.execute(command).await {
                    pending.push_back(follow_up);
                }
            }
        }

        self.view_tx.send_replace(self.session.view());
    }

    async fn execute(&mut self, command: Command) -> Option<SessionEvent> {
        match command {
            Command::StartCapture { epoch, language } => {
                info!("Starting capture {} in {}", epoch, language.code);
                match self.capture.start(language.code).await {
                    Ok(events) => {
                        self.forward_capture(epoch, events);
                        None
                    }
                    Err(error) => {
                        error!("Failed to start capture: {}", error);
                        Some(SessionEvent::CaptureStartFailed { epoch, error })
                    }
                }
            }

            Command::StopCapture => {
                if let Some(forwarder) = self.capture_forwarder.take() {
                    forwarder.abort();
                }
                match self.capture.stop().await {
                    Ok(()) => None,
                    Err(error) => {
                        error!("Failed to stop capture: {}", error);
                        Some(SessionEvent::CaptureStopFailed(error))
                    }
                }
            }

            Command::Translate { epoch, request } => {
                let translator = Arc::clone(&self.translator);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = translator.translate(&request).await;
                    let event = SessionEvent::TranslationFinished { epoch, result };
                    if !report(&tx, event).await {
                        debug!("Translation {} finished after controller shutdown", epoch);
                    }
                });
                None
            }

            Command::Speak {
                utterance,
                text,
                language,
            } => {
                let synthesis = Arc::clone(&self.synthesis);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = synthesis.speak(&text, language.code).await;
                    let event = SessionEvent::SpeechFinished { utterance, result };
                    if !report(&tx, event).await {
                        debug!("Utterance {} finished after controller shutdown", utterance);
                    }
                });
                None
            }

            Command::StopSpeaking => {
                if let Err(e) = self.synthesis.stop().await {
                    warn!("Failed to stop speech: {}", e);
                }
                None
            }
        }
    }

    fn forward_capture(&mut self, epoch: u64, mut events: mpsc::Receiver<CaptureEvent>) {
        let tx = self.tx.clone();

        let forwarder = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if !report(&tx, SessionEvent::Capture { epoch, event }).await {
                    return;
                }
            }
            report(&tx, SessionEvent::CaptureEnded { epoch }).await;
        });

        if let Some(previous) = self.capture_forwarder.replace(forwarder) {
            previous.abort();
        }
    }

    async fn release(&mut self) {
        if let Some(forwarder) = self.capture_forwarder.take() {
            forwarder.abort();
        }
        if self.capture.is_capturing() {
            if let Err(e) = self.capture.stop().await {
                error!("Failed to stop capture on shutdown: {}", e);
            }
        }
        if self.session.is_speaking() {
            if let Err(e) = self.synthesis.stop().await {
                warn!("Failed to stop speech on shutdown: {}", e);
            }
        }
    }
}

/// Deliver an adapter outcome; `false` once the controller is gone
async fn report(tx: &mpsc::WeakSender<Message>, event: SessionEvent) -> bool {
    match tx.upgrade() {
        Some(tx) => tx.send(Message::Event(event)).await.is_ok(),
        None => false,
    }
}

impl SessionHandle {
    /// Apply an intent and return the view-state right after it
    pub async fn dispatch(&self, intent: Intent) -> Result<ViewState, SessionClosed> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Message::Intent {
                intent,
                reply: Some(reply),
            })
            .await
            .map_err(|_| SessionClosed)?;
        response.await.map_err(|_| SessionClosed)
    }

    /// Queue an intent without waiting for it to be applied
    pub async fn send(&self, intent: Intent) -> Result<(), SessionClosed> {
        self.tx
            .send(Message::Intent {
                intent,
                reply: None,
            })
            .await
            .map_err(|_| SessionClosed)
    }

    /// Latest published view-state
    pub fn view(&self) -> ViewState {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_rx.clone()
    }

    /// Wait until the view-state satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&ViewState) -> bool,
    ) -> Result<ViewState, SessionClosed> {
        let mut rx = self.view_rx.clone();
        let view = rx.wait_for(predicate).await.map_err(|_| SessionClosed)?;
        Ok(view.clone())
    }

    /// Stop the controller, releasing capture and synthesis
    pub async fn shutdown(&self) -> Result<(), SessionClosed> {
        self.tx
            .send(Message::Shutdown)
            .await
            .map_err(|_| SessionClosed)
    }
}
