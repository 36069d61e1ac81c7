use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{CallerId, ContentItem, MixError, MixSchedule, ProviderKey};

/// Capability implemented by content provider clients.
///
/// Providers are treated as unreliable and independently latent. Any `Err` is
/// a total failure of that call; there is no partial success.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-friendly name used in logs.
    fn name(&self) -> &str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch up to `count` items on behalf of `caller`.
    ///
    /// The caller identifier is opaque and must be forwarded unchanged to the
    /// upstream service.
    async fn fetch(&self, caller: &CallerId, count: usize) -> Result<Vec<ContentItem>, MixError>;
}

/// Read-only mapping from provider key to provider capability.
///
/// Built once at startup and shared by reference across requests.
#[derive(Clone, Default)]
pub struct CapabilitySet {
    providers: HashMap<ProviderKey, Arc<dyn ContentProvider>>,
}

impl CapabilitySet {
    /// Create an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `key`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `key` is already registered.
    pub fn insert(
        &mut self,
        key: impl Into<ProviderKey>,
        provider: Arc<dyn ContentProvider>,
    ) -> Result<(), MixError> {
        let key = key.into();
        if self.providers.contains_key(&key) {
            return Err(MixError::InvalidArg(format!(
                "provider {key} registered twice"
            )));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(provider = %key, name = provider.name(), "registered content provider");
        self.providers.insert(key, provider);
        Ok(())
    }

    /// Look up the provider registered under `key`.
    #[must_use]
    pub fn get(&self, key: &ProviderKey) -> Option<&Arc<dyn ContentProvider>> {
        self.providers.get(key)
    }

    /// Returns true if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &ProviderKey) -> bool {
        self.providers.contains_key(key)
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &ProviderKey> {
        self.providers.keys()
    }

    /// Check that every provider referenced by `schedule` is registered.
    ///
    /// # Errors
    /// Returns `UnknownProvider` for the first unresolved key, in schedule order.
    pub fn validate(&self, schedule: &MixSchedule) -> Result<(), MixError> {
        for slot in schedule.slots() {
            for key in slot.providers() {
                if !self.contains(key) {
                    return Err(MixError::unknown_provider(key.as_str()));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().map(ProviderKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CapabilitySet").field("providers", &keys).finish()
    }
}
