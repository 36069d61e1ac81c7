//! Configuration types shared by the mixer and its hosts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the mixer does when a visited slot can no longer produce items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ExhaustionPolicy {
    /// Stop at the first exhausted slot and return what has been accumulated.
    #[default]
    FailFast,
    /// Mark the slot dead and continue with the next live slot; stop only when
    /// every slot is dead.
    SkipExhausted,
}

/// Configuration for a `Mixer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixConfig {
    /// Timeout for each individual provider call. A timed out call counts as a
    /// failure of that provider. `None` waits indefinitely.
    #[serde(default)]
    pub provider_timeout: Option<Duration>,
    /// Exhaustion handling for visited slots.
    #[serde(default)]
    pub exhaustion: ExhaustionPolicy,
}
