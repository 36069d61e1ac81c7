use std::time::Duration;

use crate::helpers::{MockProvider, P1, P2, P3, caller, healthy, mixer, sources};

#[tokio::test]
async fn healthy_schedule_is_served_round_robin() {
    let (p1, p2, p3) = healthy();
    let m = mixer(&[&p1, &p2, &p3], &[(P1, None), (P2, None), (P3, None)]);

    let items = m.fetch(&caller(), 0, 7).await;
    assert_eq!(sources(&items), vec!["1", "2", "3", "1", "2", "3", "1"]);

    let items = m.fetch(&caller(), 4, 4).await;
    assert_eq!(sources(&items), vec!["2", "3", "1", "2"]);
}

#[tokio::test]
async fn offset_wraps_around_the_schedule() {
    let (p1, p2, p3) = healthy();
    let m = mixer(
        &[&p1, &p2, &p3],
        &[(P1, None), (P1, None), (P2, None), (P3, Some(P1)), (P1, None)],
    );

    let at_zero = m.fetch(&caller(), 0, 5).await;
    let at_five = m.fetch(&caller(), 5, 5).await;
    assert_eq!(sources(&at_zero), vec!["1", "1", "2", "3", "1"]);
    assert_eq!(sources(&at_zero), sources(&at_five));

    let at_three = m.fetch(&caller(), 3, 3).await;
    assert_eq!(sources(&at_three), vec!["3", "1", "1"]);
}

#[tokio::test]
async fn repeated_requests_yield_the_same_order() {
    let (p1, p2, p3) = healthy();
    let m = mixer(&[&p1, &p2, &p3], &[(P2, None), (P1, None), (P3, None), (P1, None)]);

    let first = m.fetch(&caller(), 2, 9).await;
    let second = m.fetch(&caller(), 2, 9).await;
    assert_eq!(first.len(), 9);
    assert_eq!(sources(&first), sources(&second));
}

#[tokio::test]
async fn zero_count_contacts_no_provider() {
    let (p1, p2, p3) = healthy();
    let m = mixer(&[&p1, &p2, &p3], &[(P1, Some(P2)), (P3, None)]);

    let report = m.fetch_report(&caller(), 3, 0).await;
    assert!(report.items.is_empty());
    assert!(report.outcome.is_complete());
    assert_eq!(p1.calls() + p2.calls() + p3.calls(), 0);
}

#[tokio::test]
async fn fewer_pulses_than_slots_only_calls_visited_slots() {
    let (p1, p2, p3) = healthy();
    let m = mixer(&[&p1, &p2, &p3], &[(P1, None), (P2, None), (P3, None)]);

    let items = m.fetch(&caller(), 1, 1).await;
    assert_eq!(sources(&items), vec!["2"]);
    assert_eq!(p1.calls(), 0);
    assert_eq!(p2.calls(), 1);
    assert_eq!(p3.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slow_providers_do_not_reorder_output() {
    let p1 = MockProvider::builder()
        .name(P1)
        .delay(Duration::from_millis(60))
        .build();
    let p2 = MockProvider::builder()
        .name(P2)
        .delay(Duration::from_millis(5))
        .build();
    let p3 = MockProvider::builder().name(P3).build();
    let m = mixer(&[&p1, &p2, &p3], &[(P1, None), (P2, None), (P3, None)]);

    let items = m.fetch(&caller(), 0, 6).await;
    assert_eq!(sources(&items), vec!["1", "2", "3", "1", "2", "3"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn slots_are_fetched_concurrently() {
    let slow = |name| {
        MockProvider::builder()
            .name(name)
            .delay(Duration::from_millis(200))
            .build()
    };
    let (p1, p2, p3) = (slow(P1), slow(P2), slow(P3));
    let m = mixer(&[&p1, &p2, &p3], &[(P1, None), (P2, None), (P3, None)]);

    let started = tokio::time::Instant::now();
    let items = m.fetch(&caller(), 0, 3).await;
    assert_eq!(items.len(), 3);
    assert!(
        started.elapsed() < Duration::from_millis(500),
        "three slow slots should overlap, took {:?}",
        started.elapsed()
    );
}
