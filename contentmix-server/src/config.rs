use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use contentmix::{ContentProvider, ExhaustionPolicy, MixConfig, Mixer, ProviderKey, Slot};
use contentmix_mock::{SampleProvider, UnreachableProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub mix: MixSection,
    pub providers: Vec<ProviderConfig>,
    pub schedule: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Largest `count` served per request; larger requests are clamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

/// Built-in request cap.
pub const DEFAULT_MAX_COUNT: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixSection {
    /// Per provider call timeout in milliseconds; unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_timeout_ms: Option<u64>,
    #[serde(default)]
    pub exhaustion: ExhaustionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub key: ProviderKey,
    pub kind: ProviderKind,
}

/// Provider implementations the server can instantiate from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Sample,
    Unreachable,
}

impl Default for Config {
    fn default() -> Self {
        let c1 = Slot::with_fallback("1", "2");
        let c2 = Slot::with_fallback("2", "3");
        let c3 = Slot::with_fallback("3", "1");
        let c4 = Slot::new("1");

        Self {
            server: ServerConfig {
                addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
                max_count: Some(DEFAULT_MAX_COUNT),
            },
            mix: MixSection::default(),
            providers: ["1", "2", "3"]
                .into_iter()
                .map(|key| ProviderConfig {
                    key: ProviderKey::new(key),
                    kind: ProviderKind::Sample,
                })
                .collect(),
            schedule: vec![
                c1.clone(),
                c1.clone(),
                c2.clone(),
                c3,
                c4,
                c1.clone(),
                c1,
                c2,
            ],
        }
    }
}

impl Config {
    /// Load the configuration file at `path`, or the built-in default when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn mix_config(&self) -> MixConfig {
        MixConfig {
            provider_timeout: self.mix.provider_timeout_ms.map(Duration::from_millis),
            exhaustion: self.mix.exhaustion,
        }
    }

    /// Instantiate every configured provider and build the mixer.
    pub fn build_mixer(&self) -> Result<Mixer> {
        let builder = self
            .providers
            .iter()
            .fold(Mixer::builder(), |b, p| {
                let provider: Arc<dyn ContentProvider> = match p.kind {
                    ProviderKind::Sample => Arc::new(SampleProvider::new(p.key.clone())),
                    ProviderKind::Unreachable => Arc::new(UnreachableProvider::new(p.key.clone())),
                };
                b.with_provider(p.key.clone(), provider)
            });

        let mixer = self
            .schedule
            .iter()
            .cloned()
            .fold(builder, |b, slot| b.slot(slot))
            .config(self.mix_config())
            .build()
            .context("invalid mix configuration")?;
        Ok(mixer)
    }
}
