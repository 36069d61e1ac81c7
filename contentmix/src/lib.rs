//! contentmix mixes content from several providers into one ordered feed.
//!
//! Overview
//! - A fixed schedule of slots names, per position, a primary provider and an
//!   optional fallback provider.
//! - A request for `count` items at `offset` is served round-robin over the
//!   schedule, starting at slot `offset mod L`.
//! - Every slot gets its own concurrent fetch worker, so slow providers only
//!   cost wall-clock time; they never change the output order.
//!
//! Key behaviors and trade-offs
//! - Fallback: a failed primary call is retried once against the slot's
//!   fallback. Fallback use never sticks; the next pulse starts at the primary.
//! - Exhaustion:
//!   - `FailFast` (default): the first slot that cannot produce an item ends
//!     the request with a partial result. Predictable order, shorter pages.
//!   - `SkipExhausted`: dead slots are skipped. Fuller pages, but the order is
//!     no longer a pure function of the schedule.
//! - No errors: provider failures only ever shorten the result.
//! - Cancellation: workers are stopped and aborted the moment a request
//!   returns or its future is dropped; in-flight provider calls are dropped too.
//! - Timeouts: an optional per-provider timeout turns stalls into failures.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use contentmix::{CallerId, Mixer, Slot};
//!
//! let mixer = Mixer::builder()
//!     .with_provider("news", news.clone())
//!     .with_provider("video", video.clone())
//!     .slot(Slot::with_fallback("news", "video"))
//!     .slot(Slot::new("video"))
//!     .provider_timeout(std::time::Duration::from_millis(800))
//!     .build()?;
//!
//! let page = mixer.fetch(&CallerId::new("203.0.113.7"), 0, 10).await;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod mixer;

pub use crate::core::{Mixer, MixerBuilder};

// Re-export core types for convenience
pub use contentmix_core::{
    CallerId, CapabilitySet, ContentItem, ContentProvider, MixError, MixOutcome, MixReport,
    MixSchedule, ProviderKey, Slot, SlotServe,
};
pub use contentmix_types::{ExhaustionPolicy, MixConfig};
