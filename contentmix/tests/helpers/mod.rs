
pub use mock_provider::{MockProvider, item};

use std::sync::Arc;

use contentmix::{CallerId, ContentItem, ContentProvider, Mixer, MixerBuilder, Slot};

/// Provider keys used across tests.
pub const P1: &str = "1";
pub const P2: &str = "2";
pub const P3: &str = "3";

/// A fixed caller identity for tests that do not care about it.
pub fn caller() -> CallerId {
    CallerId::new("127.0.0.1:5000")
}

/// Source keys of `items`, in order.
pub fn sources(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|i| i.source.as_str()).collect()
}

/// Builder pre-populated with `providers` under their own names.
pub fn builder_with(providers: &[&Arc<MockProvider>]) -> MixerBuilder {
    providers.iter().fold(Mixer::builder(), |b, p| {
        b.with_provider(p.name, Arc::clone(*p) as Arc<dyn ContentProvider>)
    })
}

/// Build a mixer from `providers` and `(primary, fallback)` slot pairs.
pub fn mixer(providers: &[&Arc<MockProvider>], slots: &[(&str, Option<&str>)]) -> Mixer {
    slots
        .iter()
        .fold(builder_with(providers), |b, (p, f)| match f {
            Some(f) => b.slot(Slot::with_fallback(*p, *f)),
            None => b.slot(Slot::new(*p)),
        })
        .build()
        .expect("valid mixer")
}

/// The three healthy providers "1", "2", "3".
pub fn healthy() -> (Arc<MockProvider>, Arc<MockProvider>, Arc<MockProvider>) {
    (
        MockProvider::builder().name(P1).build(),
        MockProvider::builder().name(P2).build(),
        MockProvider::builder().name(P3).build(),
    )
}
