use crate::language;
use anyhow::{bail, Result};
use serde::Deserialize;

/// Process-wide settings, fixed at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "live-translate".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5050,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of the translation service; requests fail with a config error when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Forwarded as `is_medical`; the service decides when unset
    #[serde(default)]
    pub medical: Option<bool>,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            medical: None,
        }
    }
}

/// Languages a new session starts with
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub source_language: String,
    pub target_language: String,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            source_language: language::DEFAULT_SOURCE.to_string(),
            target_language: language::DEFAULT_TARGET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureConfig {
    /// NATS server of the speech-to-text service; capture is unavailable when unset
    pub nats_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// Text-to-speech program (e.g. "espeak-ng"); synthesis is unavailable when unset
    #[serde(default)]
    pub program: Option<String>,

    /// Flag that selects the voice language
    #[serde(default = "default_voice_flag")]
    pub voice_flag: String,
}

fn default_voice_flag() -> String {
    "-v".to_string()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            program: None,
            voice_flag: default_voice_flag(),
        }
    }
}

impl Config {
    /// Load from `path` (any format the `config` crate understands, extension optional),
    /// overridden by `LIVE_TRANSLATE`-prefixed environment variables (`__` between keys)
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("LIVE_TRANSLATE").separator("__"))
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        for code in [&self.session.source_language, &self.session.target_language] {
            if language::find(code).is_none() {
                bail!("Unsupported default language: {}", code);
            }
        }
        Ok(())
    }
}
