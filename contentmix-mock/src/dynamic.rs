use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use contentmix_core::{CallerId, ContentItem, ContentProvider, MixError, ProviderKey};

use crate::sample_items;

/// Instruction for how a `fetch` call should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Return sample items, like `SampleProvider`.
    Sample,
    /// Return the provided items immediately.
    Return(Vec<ContentItem>),
    /// Fail immediately with the provided error.
    Fail(MixError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
    /// Sleep, then return sample items.
    Delay(Duration),
}

struct InternalState {
    behavior: MockBehavior,
    // One-shot behaviors consumed by the next calls, ahead of `behavior`.
    script: VecDeque<MockBehavior>,
    callers: Vec<CallerId>,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            behavior: MockBehavior::Sample,
            script: VecDeque::new(),
            callers: Vec::new(),
        }
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior used for every call not covered by a scripted step.
    pub async fn set_behavior(&self, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.behavior = behavior;
    }

    /// Queue a behavior for exactly one upcoming call.
    pub async fn push_step(&self, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.script.push_back(behavior);
    }

    /// Number of `fetch` calls received so far.
    pub async fn calls(&self) -> usize {
        self.state.lock().await.callers.len()
    }

    /// Return a copy of the caller log, one entry per call.
    pub async fn callers(&self) -> Vec<CallerId> {
        let guard = self.state.lock().await;
        guard.callers.clone()
    }

    /// Reset behavior to `Sample` and clear the script and call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// A provider that defers all behavior to an external controller.
pub struct DynamicMockProvider {
    key: ProviderKey,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockProvider {
    /// Create a new dynamic mock provider and its controller.
    #[must_use]
    pub fn new_with_controller(
        key: impl Into<ProviderKey>,
    ) -> (Arc<dyn ContentProvider>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            key: key.into(),
            state,
        });
        (me as Arc<dyn ContentProvider>, controller)
    }
}

#[async_trait]
impl ContentProvider for DynamicMockProvider {
    fn name(&self) -> &str {
        self.key.as_str()
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn fetch(&self, caller: &CallerId, count: usize) -> Result<Vec<ContentItem>, MixError> {
        // Log the call and pick a behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.callers.push(caller.clone());
            match guard.script.pop_front() {
                Some(step) => step,
                None => guard.behavior.clone(),
            }
        };

        match behavior {
            MockBehavior::Sample => Ok(sample_items(&self.key, count)),
            MockBehavior::Return(items) => Ok(items),
            MockBehavior::Fail(e) => Err(e),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            MockBehavior::Delay(d) => {
                tokio::time::sleep(d).await;
                Ok(sample_items(&self.key, count))
            }
        }
    }
}
