//! Mix schedule: the fixed round-robin sequence of provider slots.

use serde::{Deserialize, Serialize};

use crate::error::MixError;
use crate::provider::ProviderKey;

/// One position in the schedule: a primary provider and an optional fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Provider asked first on every pulse.
    pub primary: ProviderKey,
    /// Provider asked once when the primary fails; `None` makes a primary
    /// failure terminal for the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ProviderKey>,
}

impl Slot {
    /// Slot with a primary and no fallback.
    pub fn new(primary: impl Into<ProviderKey>) -> Self {
        Self {
            primary: primary.into(),
            fallback: None,
        }
    }

    /// Slot with a primary and a fallback.
    pub fn with_fallback(primary: impl Into<ProviderKey>, fallback: impl Into<ProviderKey>) -> Self {
        Self {
            primary: primary.into(),
            fallback: Some(fallback.into()),
        }
    }

    /// Iterate the provider keys referenced by this slot, primary first.
    pub fn providers(&self) -> impl Iterator<Item = &ProviderKey> {
        core::iter::once(&self.primary).chain(self.fallback.as_ref())
    }
}

/// Ordered, non-empty sequence of slots. Its length is the round-robin modulus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Slot>", into = "Vec<Slot>")]
pub struct MixSchedule {
    slots: Vec<Slot>,
}

impl MixSchedule {
    /// Build a schedule from its slots.
    ///
    /// # Errors
    /// Returns `InvalidSchedule` if `slots` is empty.
    pub fn new(slots: Vec<Slot>) -> Result<Self, MixError> {
        if slots.is_empty() {
            return Err(MixError::InvalidSchedule(
                "schedule must contain at least one slot".to_string(),
            ));
        }
        Ok(Self { slots })
    }

    /// Number of slots (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// All slots in schedule order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot index a request with the given `offset` starts at.
    #[must_use]
    pub fn start_index(&self, offset: usize) -> usize {
        offset % self.slots.len()
    }

    /// Number of times slot `index` is visited by `count` pulses starting at `offset`.
    #[must_use]
    pub fn visits(&self, index: usize, offset: usize, count: usize) -> usize {
        let len = self.slots.len();
        if index >= len {
            return 0;
        }
        let first = (index + len - self.start_index(offset)) % len;
        if first >= count {
            0
        } else {
            (count - first - 1) / len + 1
        }
    }
}

impl TryFrom<Vec<Slot>> for MixSchedule {
    type Error = MixError;

    fn try_from(slots: Vec<Slot>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<MixSchedule> for Vec<Slot> {
    fn from(s: MixSchedule) -> Self {
        s.slots
    }
}
