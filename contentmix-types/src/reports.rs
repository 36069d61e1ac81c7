//! Report envelopes produced by the mixer.

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::provider::ProviderKey;

/// Terminal state of one mix request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum MixOutcome {
    /// Every requested pulse was served.
    Complete,
    /// A visited slot was exhausted; the items are a partial result.
    Exhausted {
        /// Index of the slot that could not produce an item.
        slot: usize,
        /// Primary provider of that slot.
        provider: ProviderKey,
    },
}

impl MixOutcome {
    /// Returns true for `Complete`.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Which provider served one pulse of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotServe {
    /// Schedule index of the slot.
    pub slot: usize,
    /// Provider that produced the batch.
    pub provider: ProviderKey,
    /// True if the slot's fallback produced the batch.
    pub fallback: bool,
    /// Number of items in the batch.
    pub items: usize,
}

/// Result of a mix request with its terminal state and per-pulse attribution.
///
/// `items` is exactly what `Mixer::fetch` returns; the rest is diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixReport {
    /// Ordered content items.
    pub items: Vec<ContentItem>,
    /// How the request ended.
    pub outcome: MixOutcome,
    /// One entry per served pulse, in consumption order.
    pub served: Vec<SlotServe>,
}

impl MixReport {
    /// An empty, complete report (e.g. for `count == 0`).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            outcome: MixOutcome::Complete,
            served: Vec::new(),
        }
    }
}
