use contentmix::{CallerId, ProviderKey};

use crate::helpers::{MockProvider, P1, P2, P3, caller, mixer, sources};

#[tokio::test]
async fn fallback_serves_a_failing_primary() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let m = mixer(
        &[&p1, &p2, &p3],
        &[(P1, None), (P1, None), (P2, None), (P3, Some(P1)), (P1, None)],
    );

    let report = m.fetch_report(&caller(), 0, 5).await;
    assert_eq!(sources(&report.items), vec!["1", "1", "2", "1", "1"]);
    assert!(report.outcome.is_complete());

    let fourth = &report.served[3];
    assert_eq!(fourth.slot, 3);
    assert_eq!(fourth.provider, ProviderKey::new(P1));
    assert!(fourth.fallback);
    assert!(report.served.iter().filter(|s| s.fallback).count() == 1);
}

#[tokio::test]
async fn fallback_is_not_sticky() {
    let p1 = MockProvider::builder().name(P1).build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let m = mixer(&[&p1, &p3], &[(P3, Some(P1))]);

    let items = m.fetch(&caller(), 0, 4).await;
    assert_eq!(sources(&items), vec!["1"; 4]);
    // Every pulse asks the primary first.
    assert_eq!(p3.calls(), 4);
    assert_eq!(p1.calls(), 4);
}

#[tokio::test]
async fn recovered_primary_is_used_again() {
    let p1 = MockProvider::builder().name(P1).build();
    let flaky = MockProvider::builder()
        .name(P2)
        .with_fetch_fn(|call| {
            if call == 1 {
                Err(contentmix::MixError::provider(P2, "transient"))
            } else {
                Ok(vec![crate::helpers::item(P2, &format!("2-{call}"))])
            }
        })
        .build();
    let m = mixer(&[&p1, &flaky], &[(P2, Some(P1))]);

    let report = m.fetch_report(&caller(), 0, 3).await;
    assert_eq!(sources(&report.items), vec!["1", "2", "2"]);
    let used_fallback: Vec<bool> = report.served.iter().map(|s| s.fallback).collect();
    assert_eq!(used_fallback, vec![true, false, false]);
}

#[tokio::test]
async fn caller_is_forwarded_to_primary_and_fallback() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).fails().build();
    let m = mixer(&[&p1, &p2], &[(P1, None), (P2, Some(P1))]);

    let who = CallerId::new("198.51.100.23");
    let items = m.fetch(&who, 0, 2).await;
    assert_eq!(items.len(), 2);
    assert_eq!(p2.callers().await, vec![who.clone()]);
    assert_eq!(p1.callers().await, vec![who.clone(), who]);
}

// Schedule with every slot backed by a fallback, third provider down.
#[tokio::test]
async fn chained_fallbacks_with_one_provider_down() {
    let p1 = MockProvider::builder().name(P1).build();
    let p2 = MockProvider::builder().name(P2).build();
    let p3 = MockProvider::builder().name(P3).fails().build();
    let c1 = (P1, Some(P2));
    let c2 = (P2, Some(P3));
    let c3 = (P3, Some(P1));
    let m = mixer(&[&p1, &p2, &p3], &[c1, c1, c2, c3, c1]);

    let items = m.fetch(&caller(), 0, 5).await;
    assert_eq!(sources(&items), vec!["1", "1", "2", "1", "1"]);
}
