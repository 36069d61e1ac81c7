use std::sync::Arc;
use std::time::Duration;

use contentmix_core::{
    CapabilitySet, ContentProvider, ExhaustionPolicy, MixConfig, MixError, MixSchedule,
    ProviderKey, Slot,
};

/// Mixer that draws content round-robin from a fixed schedule of provider slots.
///
/// The capability set, schedule and configuration are immutable once built, so
/// a single `Mixer` (typically behind an `Arc`) serves any number of
/// concurrent requests without locking. All per-request state (workers,
/// handoff channels, the result buffer) lives inside one `fetch` call.
#[derive(Debug)]
pub struct Mixer {
    pub(crate) providers: CapabilitySet,
    pub(crate) schedule: MixSchedule,
    pub(crate) cfg: MixConfig,
}

/// Builder for constructing a `Mixer` with custom configuration.
pub struct MixerBuilder {
    providers: CapabilitySet,
    slots: Vec<Slot>,
    cfg: MixConfig,
    error: Option<MixError>,
}

impl Default for MixerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MixerBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no providers and an empty schedule; both must be filled in.
    /// - Defaults: no provider timeout, fail-fast exhaustion.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: CapabilitySet::new(),
            slots: Vec::new(),
            cfg: MixConfig::default(),
            error: None,
        }
    }

    /// Register a provider under `key`.
    ///
    /// Registering the same key twice makes [`build`](Self::build) fail.
    #[must_use]
    pub fn with_provider(
        mut self,
        key: impl Into<ProviderKey>,
        provider: Arc<dyn ContentProvider>,
    ) -> Self {
        if let Err(e) = self.providers.insert(key, provider)
            && self.error.is_none()
        {
            self.error = Some(e);
        }
        self
    }

    /// Use an already assembled capability set, replacing any registered providers.
    #[must_use]
    pub fn providers(mut self, providers: CapabilitySet) -> Self {
        self.providers = providers;
        self
    }

    /// Append one slot to the schedule.
    #[must_use]
    pub fn slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Replace the schedule.
    #[must_use]
    pub fn schedule(mut self, schedule: MixSchedule) -> Self {
        self.slots = schedule.into();
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, cfg: MixConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Bound every provider call by `timeout`.
    ///
    /// Behavior and trade-offs:
    /// - A timed out call counts as a failure, so it triggers the slot's
    ///   fallback (or exhausts the slot).
    /// - Without a timeout a stalled provider stalls every pulse that depends
    ///   on it.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = Some(timeout);
        self
    }

    /// Select how an exhausted slot ends (or does not end) a request.
    ///
    /// Behavior and trade-offs:
    /// - `FailFast` (default): the first exhausted slot truncates the result.
    /// - `SkipExhausted`: dead slots are skipped and the remaining slots keep
    ///   serving; the result order then no longer follows the schedule alone.
    #[must_use]
    pub const fn exhaustion_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.cfg.exhaustion = policy;
        self
    }

    /// Build the `Mixer`.
    ///
    /// # Errors
    /// - `InvalidArg` if a provider key was registered twice.
    /// - `InvalidSchedule` if no slot was configured.
    /// - `UnknownProvider` if a slot references an unregistered provider.
    pub fn build(self) -> Result<Mixer, MixError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let schedule = MixSchedule::new(self.slots)?;
        self.providers.validate(&schedule)?;

        Ok(Mixer {
            providers: self.providers,
            schedule,
            cfg: self.cfg,
        })
    }
}

impl Mixer {
    /// Start building a new `Mixer`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use contentmix::{Mixer, Slot};
    ///
    /// let mixer = Mixer::builder()
    ///     .with_provider("1", Arc::new(SampleProvider::new("1")))
    ///     .with_provider("2", Arc::new(SampleProvider::new("2")))
    ///     .slot(Slot::with_fallback("1", "2"))
    ///     .slot(Slot::new("2"))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> MixerBuilder {
        MixerBuilder::new()
    }

    /// The configured schedule.
    #[must_use]
    pub const fn schedule(&self) -> &MixSchedule {
        &self.schedule
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &MixConfig {
        &self.cfg
    }

    /// The registered providers.
    #[must_use]
    pub const fn providers(&self) -> &CapabilitySet {
        &self.providers
    }

    /// Resolve a key validated at build time.
    pub(crate) fn provider(&self, key: &ProviderKey) -> Option<Arc<dyn ContentProvider>> {
        self.providers.get(key).cloned()
    }
}

/// Wrap a provider future with an optional timeout and standardized timeout error mapping.
pub(crate) async fn provider_call_with_timeout<T, Fut>(
    provider: &ProviderKey,
    timeout: Option<Duration>,
    fut: Fut,
) -> Result<T, MixError>
where
    Fut: std::future::Future<Output = Result<T, MixError>>,
{
    match timeout {
        Some(t) => (tokio::time::timeout(t, fut).await)
            .unwrap_or_else(|_| Err(MixError::provider_timeout(provider.as_str()))),
        None => fut.await,
    }
}
