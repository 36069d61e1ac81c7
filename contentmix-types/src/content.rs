//! Content records produced by providers and the opaque caller identity.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderKey;

/// One piece of content fetched from a provider.
///
/// Never mutated after creation; ownership passes to the caller once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Provider-assigned identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Key of the provider that produced the item.
    pub source: ProviderKey,
    /// Short description; may be empty.
    #[serde(default)]
    pub summary: String,
    /// Link to the full content; may be empty.
    #[serde(default)]
    pub link: String,
    /// Instant after which the item should no longer be shown.
    pub expiry: DateTime<Utc>,
}

/// Opaque identifier of the end user a request is made on behalf of.
///
/// Typically derived from a forwarded-for header or the peer address and passed
/// unchanged to every provider call of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Wrap a caller identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
