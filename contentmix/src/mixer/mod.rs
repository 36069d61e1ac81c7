pub mod pool;
pub mod worker;

use contentmix_core::{
    CallerId, ContentItem, ExhaustionPolicy, MixOutcome, MixReport, SlotServe,
};

use crate::Mixer;
use pool::WorkerPool;

impl Mixer {
    /// Fetch `count` items in schedule order starting at slot `offset mod L`.
    ///
    /// Behavior:
    /// - One slot worker per schedule slot fetches ahead concurrently; output
    ///   order depends only on schedule, `offset` and `count`, never on
    ///   provider latency.
    /// - A slot whose primary (and fallback, if any) fails is exhausted. Under
    ///   the default fail-fast policy the first exhausted visit ends the
    ///   request and the items gathered so far are returned.
    /// - `count == 0` returns immediately without contacting any provider.
    ///
    /// Never fails: a result shorter than `count` is the only sign of
    /// provider trouble.
    pub async fn fetch(&self, caller: &CallerId, offset: usize, count: usize) -> Vec<ContentItem> {
        self.fetch_report(caller, offset, count).await.items
    }

    /// Like [`fetch`](Self::fetch), also reporting how the request ended and
    /// which provider served each pulse.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "contentmix::mixer::fetch",
            skip(self, caller),
            fields(caller = %caller, slots = self.schedule.len()),
        )
    )]
    pub async fn fetch_report(&self, caller: &CallerId, offset: usize, count: usize) -> MixReport {
        if count == 0 {
            return MixReport::empty();
        }

        let len = self.schedule.len();
        let skip_exhausted = matches!(self.cfg.exhaustion, ExhaustionPolicy::SkipExhausted);
        let mut pool = WorkerPool::spawn(self, caller, offset, count);

        let mut report = MixReport::empty();
        let mut dead = vec![false; len];
        let mut index = self.schedule.start_index(offset);
        let mut remaining = count;

        while remaining > 0 {
            if dead[index] {
                index = (index + 1) % len;
                continue;
            }

            if let Some(batch) = pool.pull(index).await {
                report.served.push(SlotServe {
                    slot: index,
                    provider: batch.provider,
                    fallback: batch.fallback,
                    items: batch.items.len(),
                });
                report.items.extend(batch.items);
                remaining -= 1;
                index = (index + 1) % len;
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(slot = index, served = count - remaining, "slot exhausted");

            dead[index] = true;
            if !skip_exhausted || dead.iter().all(|d| *d) {
                report.outcome = MixOutcome::Exhausted {
                    slot: index,
                    provider: self.schedule.slots()[index].primary.clone(),
                };
                break;
            }
            index = (index + 1) % len;
        }

        // Stop every worker now, including ones blocked in a provider call.
        drop(pool);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            requested = count,
            returned = report.items.len(),
            complete = report.outcome.is_complete(),
            "mix finished"
        );

        report
    }
}
