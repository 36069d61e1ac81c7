use std::time::Duration;

use contentmix::{CallerId, Mixer, MixError, MixOutcome, Slot};
use contentmix_mock::{DynamicMockProvider, MockBehavior, SampleProvider, UnreachableProvider};
use std::sync::Arc;

use crate::helpers::sources;

#[tokio::test]
async fn provider_recovery_between_requests() {
    let (news, ctl) = DynamicMockProvider::new_with_controller("news");
    let m = Mixer::builder()
        .with_provider("news", news)
        .with_provider("video", Arc::new(SampleProvider::new("video")))
        .slot(Slot::new("video"))
        .slot(Slot::new("news"))
        .build()
        .unwrap();
    let who = CallerId::new("203.0.113.7");

    ctl.set_behavior(MockBehavior::Fail(MixError::unavailable("news")))
        .await;
    let down = m.fetch(&who, 0, 4).await;
    assert_eq!(sources(&down), vec!["video"]);

    ctl.set_behavior(MockBehavior::Sample).await;
    let up = m.fetch(&who, 0, 4).await;
    assert_eq!(sources(&up), vec!["video", "news", "video", "news"]);
    assert!(ctl.callers().await.iter().all(|c| c == &who));
}

#[tokio::test(start_paused = true)]
async fn stalled_dynamic_provider_times_out_to_fallback() {
    let (slow, ctl) = DynamicMockProvider::new_with_controller("slow");
    ctl.push_step(MockBehavior::Hang).await;
    let m = Mixer::builder()
        .with_provider("slow", slow)
        .with_provider("backup", Arc::new(SampleProvider::new("backup")))
        .slot(Slot::with_fallback("slow", "backup"))
        .provider_timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let items = m.fetch(&CallerId::new("c"), 0, 2).await;
    assert_eq!(sources(&items), vec!["backup", "slow"]);
}

#[tokio::test]
async fn unreachable_slot_reports_exhaustion() {
    let m = Mixer::builder()
        .with_provider("1", Arc::new(SampleProvider::new("1")))
        .with_provider("3", Arc::new(UnreachableProvider::new("3")))
        .slot(Slot::new("1"))
        .slot(Slot::new("3"))
        .build()
        .unwrap();

    let report = m.fetch_report(&CallerId::new("c"), 1, 3).await;
    assert!(report.items.is_empty());
    assert!(matches!(report.outcome, MixOutcome::Exhausted { slot: 1, .. }));
}
