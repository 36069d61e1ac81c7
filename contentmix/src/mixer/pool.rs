use contentmix_core::{CallerId, ExhaustionPolicy, WorkerHandle};
use tokio::sync::mpsc;

use super::worker::{SlotBatch, SlotWorkerParams, spawn_slot_worker};
use crate::Mixer;

/// The per-request set of slot workers, indexed like the schedule.
///
/// Dropping the pool stops every worker and aborts the ones still running.
pub struct WorkerPool {
    handles: Vec<WorkerHandle>,
    outputs: Vec<mpsc::Receiver<SlotBatch>>,
}

impl WorkerPool {
    /// Provision one worker per slot, including slots this request never visits.
    pub fn spawn(mixer: &Mixer, caller: &CallerId, offset: usize, count: usize) -> Self {
        let schedule = mixer.schedule();
        let mut handles = Vec::with_capacity(schedule.len());
        let mut outputs = Vec::with_capacity(schedule.len());

        for (index, slot) in schedule.slots().iter().enumerate() {
            let Some(primary) = mixer.provider(&slot.primary) else {
                // Unreachable after build-time validation; an empty output reads as exhausted.
                let (_tx, rx) = mpsc::channel(1);
                outputs.push(rx);
                continue;
            };
            let fallback = slot
                .fallback
                .as_ref()
                .and_then(|k| mixer.provider(k).map(|p| (k.clone(), p)));

            let (handle, rx) = spawn_slot_worker(SlotWorkerParams {
                slot_index: index,
                primary: (slot.primary.clone(), primary),
                fallback,
                caller: caller.clone(),
                budget: pulse_budget(mixer, index, offset, count),
                provider_timeout: mixer.config().provider_timeout,
            });
            handles.push(handle);
            outputs.push(rx);
        }

        Self { handles, outputs }
    }

    /// Wait for the next batch of slot `index`; `None` once it is exhausted.
    pub async fn pull(&mut self, index: usize) -> Option<SlotBatch> {
        match self.outputs.get_mut(index) {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

/// Upper bound on the pulses the mixer can demand from slot `index`.
///
/// Fail-fast consumption follows the schedule exactly, so the bound is the
/// visit count. When exhausted slots are skipped, any live slot may absorb the
/// remaining pulses.
pub fn pulse_budget(mixer: &Mixer, index: usize, offset: usize, count: usize) -> usize {
    match mixer.config().exhaustion {
        ExhaustionPolicy::SkipExhausted => count,
        _ => mixer.schedule().visits(index, offset, count),
    }
}
