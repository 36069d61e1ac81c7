//! contentmix-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod content;
mod error;
mod provider;
mod reports;
mod schedule;

pub use config::{ExhaustionPolicy, MixConfig};
pub use content::{CallerId, ContentItem};
pub use error::MixError;
pub use provider::ProviderKey;
pub use reports::{MixOutcome, MixReport, SlotServe};
pub use schedule::{MixSchedule, Slot};
