//! Mock content providers.
//!
//! - [`SampleProvider`] always succeeds with freshly generated items.
//! - [`UnreachableProvider`] always fails, like a provider whose upstream is down.
//! - [`DynamicMockProvider`] defers to a [`DynamicMockController`] so tests can
//!   change behavior between and during requests.
use async_trait::async_trait;
use chrono::Utc;
use contentmix_core::{CallerId, ContentItem, ContentProvider, MixError, ProviderKey};
use rand::Rng;

mod dynamic;

pub use dynamic::{DynamicMockController, DynamicMockProvider, MockBehavior};

/// Build `count` sample items attributed to `source`.
///
/// Ids are random integers rendered as strings; titles are the literal
/// `"title"`; expiry is the current instant.
pub fn sample_items(source: &ProviderKey, count: usize) -> Vec<ContentItem> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| ContentItem {
            id: rng.random::<u32>().to_string(),
            title: "title".to_string(),
            source: source.clone(),
            summary: String::new(),
            link: String::new(),
            expiry: Utc::now(),
        })
        .collect()
}

/// Provider that always returns `count` sample items tagged with its key.
#[derive(Debug, Clone)]
pub struct SampleProvider {
    key: ProviderKey,
}

impl SampleProvider {
    #[must_use]
    pub fn new(key: impl Into<ProviderKey>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl ContentProvider for SampleProvider {
    fn name(&self) -> &str {
        self.key.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Sample"
    }

    async fn fetch(&self, _caller: &CallerId, count: usize) -> Result<Vec<ContentItem>, MixError> {
        Ok(sample_items(&self.key, count))
    }
}

/// Provider whose every call fails with `MixError::Unavailable`.
#[derive(Debug, Clone)]
pub struct UnreachableProvider {
    key: ProviderKey,
}

impl UnreachableProvider {
    #[must_use]
    pub fn new(key: impl Into<ProviderKey>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl ContentProvider for UnreachableProvider {
    fn name(&self) -> &str {
        self.key.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Unreachable"
    }

    async fn fetch(&self, _caller: &CallerId, _count: usize) -> Result<Vec<ContentItem>, MixError> {
        Err(MixError::unavailable(self.key.as_str()))
    }
}
