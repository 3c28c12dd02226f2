use super::adapter::{SynthesisAdapter, SynthesisError};
use crate::config::SynthesisConfig;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Speaks by running a text-to-speech program once per utterance
///
/// Invoked as `<program> <voice_flag> <language> <text>`, e.g. `espeak-ng -v es-ES "Hola"`.
pub struct CommandSynthesizer {
    program: String,
    voice_flag: String,
    next_id: AtomicU64,
    current: Mutex<Option<Utterance>>,
    /// Held while a child process is alive
    playback: tokio::sync::Mutex<()>,
}

/// The most recently started utterance; `cancel` is `None` once it has been stopped
struct Utterance {
    id: u64,
    cancel: Option<oneshot::Sender<()>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, voice_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice_flag: voice_flag.into(),
            next_id: AtomicU64::new(0),
            current: Mutex::new(None),
            playback: tokio::sync::Mutex::new(()),
        }
    }

    /// Build from config; `None` when no program is configured
    pub fn from_config(config: &SynthesisConfig) -> Option<Self> {
        config
            .program
            .as_deref()
            .map(str::trim)
            .filter(|program| !program.is_empty())
            .map(|program| Self::new(program, config.voice_flag.clone()))
    }

    fn begin(&self) -> Result<(u64, oneshot::Receiver<()>), SynthesisError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| SynthesisError::Runtime("synthesizer state poisoned".to_string()))?;

        if current.as_ref().is_some_and(|u| u.cancel.is_some()) {
            return Err(SynthesisError::Busy);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        *current = Some(Utterance {
            id,
            cancel: Some(tx),
        });
        Ok((id, rx))
    }

    fn finish(&self, id: u64) {
        if let Ok(mut current) = self.current.lock() {
            if current.as_ref().is_some_and(|u| u.id == id) {
                current.take();
            }
        }
    }
}

#[async_trait::async_trait]
impl SynthesisAdapter for CommandSynthesizer {
    async fn speak(&self, text: &str, language_tag: &str) -> Result<(), SynthesisError> {
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        let (id, mut cancel) = self.begin()?;

        // A stopped utterance may still be reaping its process
        let _playback = tokio::select! {
            guard = self.playback.lock() => guard,
            Ok(()) = &mut cancel => {
                self.finish(id);
                return Err(SynthesisError::Cancelled);
            }
        };

        debug!("Speaking {} chars with {} ({})", text.len(), self.program, language_tag);

        let spawned = Command::new(&self.program)
            .arg(&self.voice_flag)
            .arg(language_tag)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                self.finish(id);
                warn!("Failed to spawn {}: {}", self.program, e);
                return Err(SynthesisError::Runtime(format!(
                    "failed to run {}: {}",
                    self.program, e
                )));
            }
        };

        let result = tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(SynthesisError::Runtime(format!(
                    "{} exited with {}",
                    self.program, status
                ))),
                Err(e) => Err(SynthesisError::Runtime(e.to_string())),
            },
            Ok(()) = &mut cancel => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", self.program, e);
                }
                Err(SynthesisError::Cancelled)
            }
        };

        self.finish(id);
        result
    }

    async fn stop(&self) -> Result<(), SynthesisError> {
        let sender = self
            .current
            .lock()
            .map_err(|_| SynthesisError::Runtime("synthesizer state poisoned".to_string()))?
            .as_mut()
            .and_then(|u| u.cancel.take());

        if let Some(tx) = sender {
            info!("Stopping current utterance");
            let _ = tx.send(());
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
