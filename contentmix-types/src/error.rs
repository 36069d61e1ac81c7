use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the contentmix workspace.
///
/// Provider failures never leave the mixer as errors: they degrade to a shorter
/// result. This type is what providers return and what construction-time
/// validation reports.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MixError {
    /// An individual provider returned an error.
    #[error("{provider} failed: {msg}")]
    Provider {
        /// Provider key that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {provider}")]
    ProviderTimeout {
        /// Provider key that timed out.
        provider: String,
    },

    /// The provider could not be reached at all.
    #[error("provider unreachable: {provider}")]
    Unavailable {
        /// Provider key that was unreachable.
        provider: String,
    },

    /// A schedule slot references a provider that is not registered.
    #[error("unknown provider: {provider}")]
    UnknownProvider {
        /// The unresolved provider key.
        provider: String,
    },

    /// The mix schedule is unusable (e.g. empty).
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl MixError {
    /// Helper: build a `Provider` error with the provider key and message.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
        }
    }

    /// Helper: build an `Unavailable` error.
    pub fn unavailable(provider: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
        }
    }

    /// Helper: build an `UnknownProvider` error.
    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::UnknownProvider {
            provider: provider.into(),
        }
    }

    /// Returns true if this error is a provider timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ProviderTimeout { .. })
    }
}
