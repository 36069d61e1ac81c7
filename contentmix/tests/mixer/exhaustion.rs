use contentmix::{MixOutcome, ProviderKey};

use crate::helpers::{MockProvider, P1, P2, P3, caller, mixer, sources};

#[tokio::test]
async fn slot_without_fallback_truncates_the_result() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).fails().build();
    let m = mixer(&[&p1, &p2], &[(P1, None), (P2, None), (P1, None)]);

    let report = m.fetch_report(&caller(), 0, 3).await;
    assert_eq!(sources(&report.items), vec!["1"]);
    assert_eq!(
        report.outcome,
        MixOutcome::Exhausted {
            slot: 1,
            provider: ProviderKey::new(P2),
        }
    );
}

#[tokio::test]
async fn exhausted_fallback_ends_the_request() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let m = mixer(
        &[&p1, &p2, &p3],
        &[(P1, None), (P1, None), (P2, None), (P3, Some(P3)), (P1, None)],
    );

    let items = m.fetch(&caller(), 0, 5).await;
    assert_eq!(sources(&items), vec!["1", "1", "2"]);
}

#[tokio::test]
async fn first_exhausted_slot_wins_even_if_later_slots_are_healthy() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).fails().build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let m = mixer(&[&p1, &p2, &p3], &[(P1, None), (P1, None), (P2, None), (P3, None)]);

    let report = m.fetch_report(&caller(), 0, 5).await;
    assert_eq!(sources(&report.items), vec!["1", "1"]);
    assert!(matches!(report.outcome, MixOutcome::Exhausted { slot: 2, .. }));
}

#[tokio::test]
async fn two_providers_down_behind_chained_fallbacks() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).fails().build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let c1 = (P1, Some(P2));
    let c2 = (P2, Some(P3));
    let c3 = (P3, Some(P1));
    let m = mixer(&[&p1, &p2, &p3], &[c1, c1, c3, c2, c1]);

    let items = m.fetch(&caller(), 0, 5).await;
    assert_eq!(sources(&items), vec!["1", "1", "1"]);
}

#[tokio::test]
async fn exhaustion_on_the_first_pulse_returns_nothing() {
    let p1 = MockProvider::builder().name(P1).fails().build();
    let p2 = MockProvider::builder().name(P2).build();
    let m = mixer(&[&p1, &p2], &[(P1, None), (P2, None)]);

    let report = m.fetch_report(&caller(), 0, 4).await;
    assert!(report.items.is_empty());
    assert!(report.served.is_empty());
    assert!(!report.outcome.is_complete());
}

#[tokio::test]
async fn later_visit_of_a_slot_can_exhaust_it() {
    let p1 = MockProvider::builder().name(P1).build();
    let once = MockProvider::builder()
        .name(P2)
        .with_fetch_fn(|call| {
            if call == 1 {
                Ok(vec![crate::helpers::item(P2, "only")])
            } else {
                Err(contentmix::MixError::unavailable(P2))
            }
        })
        .build();
    let m = mixer(&[&p1, &once], &[(P1, None), (P2, None)]);

    let items = m.fetch(&caller(), 0, 6).await;
    assert_eq!(sources(&items), vec!["1", "2", "1"]);
}
