use std::sync::Arc;
use std::time::Duration;

use contentmix_core::{CallerId, ContentItem, ContentProvider, ProviderKey, WorkerHandle};
use tokio::sync::{mpsc, oneshot};

use crate::core::provider_call_with_timeout;

/// Items produced for one pulse of a slot, tagged with who produced them.
#[derive(Debug)]
pub struct SlotBatch {
    pub items: Vec<ContentItem>,
    pub provider: ProviderKey,
    pub fallback: bool,
}

pub struct SlotWorkerParams {
    pub slot_index: usize,
    pub primary: (ProviderKey, Arc<dyn ContentProvider>),
    pub fallback: Option<(ProviderKey, Arc<dyn ContentProvider>)>,
    pub caller: CallerId,
    /// Most pulses the mixer can demand from this slot in the current request.
    pub budget: usize,
    pub provider_timeout: Option<Duration>,
}

/// Spawn the fetch worker for one slot.
///
/// The returned receiver yields one `SlotBatch` per pulse. It closes (yields
/// `None`) when the slot is exhausted, when the budget has been served, or
/// when the handle is stopped or dropped.
pub fn spawn_slot_worker(params: SlotWorkerParams) -> (WorkerHandle, mpsc::Receiver<SlotBatch>) {
    // Capacity 1 plus reserve-before-fetch keeps at most one batch fetched
    // ahead of the consumer.
    let (tx, rx) = mpsc::channel::<SlotBatch>(1);
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let join = tokio::spawn(async move {
        let mut served = 0usize;
        while served < params.budget {
            let permit = tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                permit = tx.reserve() => match permit {
                    Ok(p) => p,
                    // Mixer went away
                    Err(_) => break,
                },
            };

            let batch = tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                batch = fetch_pulse(&params) => batch,
            };

            match batch {
                Some(b) => permit.send(b),
                None => break,
            }
            served += 1;
        }
        // Dropping `tx` here is what the mixer observes as exhaustion.
    });

    (WorkerHandle::new(join, stop_tx), rx)
}

/// One pulse: primary once, then the fallback once. `None` means exhausted.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "contentmix::worker::pulse",
        skip(params),
        fields(slot = params.slot_index, primary = %params.primary.0),
    )
)]
async fn fetch_pulse(params: &SlotWorkerParams) -> Option<SlotBatch> {
    let (primary_key, primary) = &params.primary;
    match provider_call_with_timeout(
        primary_key,
        params.provider_timeout,
        primary.fetch(&params.caller, 1),
    )
    .await
    {
        Ok(items) => {
            return Some(SlotBatch {
                items,
                provider: primary_key.clone(),
                fallback: false,
            });
        }
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                slot = params.slot_index,
                provider = %primary_key,
                error = %_e,
                has_fallback = params.fallback.is_some(),
                "primary provider failed"
            );
        }
    }

    let (fallback_key, fallback) = params.fallback.as_ref()?;
    match provider_call_with_timeout(
        fallback_key,
        params.provider_timeout,
        fallback.fetch(&params.caller, 1),
    )
    .await
    {
        Ok(items) => Some(SlotBatch {
            items,
            provider: fallback_key.clone(),
            fallback: true,
        }),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                slot = params.slot_index,
                provider = %fallback_key,
                error = %_e,
                "fallback provider failed"
            );
            None
        }
    }
}
