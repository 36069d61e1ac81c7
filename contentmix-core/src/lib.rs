//! contentmix-core
//!
//! Core types, traits, and utilities shared across the contentmix ecosystem.
//!
//! - `provider`: the `ContentProvider` capability trait and the `CapabilitySet`
//!   that maps provider keys to capabilities.
//! - `worker`: `WorkerHandle`, the owner of a per-request worker task.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `worker::WorkerHandle` wraps `tokio::task::JoinHandle<()>` and uses
//! `tokio::sync::oneshot::Sender<()>` for cooperative shutdown, so code that
//! spawns workers must run under a Tokio 1.x runtime.
//!
#![warn(missing_docs)]

/// Content provider trait and capability set.
pub mod provider;
/// Per-request worker handle utilities used by the mixer and tests.
pub mod worker;

pub use provider::{CapabilitySet, ContentProvider};
pub use worker::WorkerHandle;

pub use contentmix_types::{
    CallerId, ContentItem, ExhaustionPolicy, MixConfig, MixError, MixOutcome, MixReport,
    MixSchedule, ProviderKey, Slot, SlotServe,
};
