//! End-to-end behavior of the fact provider: remote preference, fallback,
//! interruption and the ERROR sentinel.

use factverse_core::remote::RemoteFactClient;
use factverse_core::testing::{fast_settings, StubBackend};
use factverse_core::{FactEntry, FactProvider, FactStore, Provenance};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn bananas() -> Arc<FactStore> {
    Arc::new(FactStore::from_json_str(r#"{"fun": ["Bananas are berries."]}"#).unwrap())
}

#[tokio::test]
async fn test_remote_disabled_always_local() {
    let mut provider = FactProvider::new(bananas());
    assert!(!provider.has_remote());

    for _ in 0..10 {
        let entry = provider.get_fact("fun", true).await;
        assert_eq!(entry, FactEntry::new("Bananas are berries.", Provenance::Local));
    }
}

#[tokio::test]
async fn test_unknown_category_with_empty_store() {
    let mut provider = FactProvider::new(Arc::new(FactStore::empty()));
    let entry = provider.get_fact("space", false).await;
    assert_eq!(
        entry,
        FactEntry::new("No facts available for category: space", Provenance::Error)
    );
    assert!(entry.is_error());
}

#[tokio::test]
async fn test_empty_category_yields_error_sentinel() {
    let store = Arc::new(FactStore::from_json_str(r#"{"lazy": []}"#).unwrap());
    let mut provider = FactProvider::new(store);
    let entry = provider.get_fact("lazy", true).await;
    assert_eq!(entry.provenance, Provenance::Error);
    assert_eq!(entry.text, "No facts available for category: lazy");
}

#[tokio::test]
async fn test_failing_remote_falls_back_to_local() {
    let stub = StubBackend::always_failing();
    let handle = stub.handle();
    let mut provider = FactProvider::new(bananas())
        .with_remote(RemoteFactClient::new(stub).with_settings(fast_settings()));

    let entry = provider.get_fact("fun", true).await;
    assert_eq!(entry, FactEntry::new("Bananas are berries.", Provenance::Local));
    assert_eq!(handle.calls(), 3);
}

#[tokio::test]
async fn test_fallback_matches_local_distribution() {
    // With the same seed, fallback picks are exactly the store's own picks.
    let store = Arc::new(FactStore::builtin());
    let mut provider = FactProvider::new(Arc::clone(&store))
        .with_seed(21)
        .with_remote(RemoteFactClient::new(StubBackend::always_failing()).with_settings(fast_settings()));
    let mut rng = StdRng::seed_from_u64(21);

    for _ in 0..10 {
        let entry = provider.get_fact("motivation", true).await;
        let expected = store.pick_with_rng("motivation", &mut rng).unwrap();
        assert_eq!(entry.provenance, Provenance::Local);
        assert_eq!(entry.text, expected);
    }
}

#[tokio::test]
async fn test_fatal_remote_error_falls_back_after_one_call() {
    let stub = StubBackend::scripted(vec![factverse_core::StubReply::fatal("401 unauthorized")]);
    let handle = stub.handle();
    let mut provider = FactProvider::new(bananas())
        .with_remote(RemoteFactClient::new(stub).with_settings(fast_settings()));

    let entry = provider.get_fact("fun", true).await;
    assert_eq!(entry.provenance, Provenance::Local);
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn test_remote_failure_with_unknown_category_is_error() {
    let mut provider = FactProvider::new(bananas())
        .with_remote(RemoteFactClient::new(StubBackend::always_failing()).with_settings(fast_settings()));

    let entry = provider.get_fact("space", true).await;
    assert_eq!(entry.provenance, Provenance::Error);
}

#[tokio::test]
async fn test_interrupt_abandons_remote_and_uses_local() {
    let stub = StubBackend::hanging();
    let handle = stub.handle();
    let mut provider = FactProvider::new(bananas())
        .with_remote(RemoteFactClient::new(stub).with_settings(fast_settings()));

    let entry = tokio::time::timeout(
        Duration::from_secs(2),
        provider.get_fact_until("fun", true, tokio::time::sleep(Duration::from_millis(20))),
    )
    .await
    .expect("interrupt should end the remote wait");

    assert_eq!(entry, FactEntry::new("Bananas are berries.", Provenance::Local));
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn test_remote_facts_vary_and_never_repeat() {
    let stub = StubBackend::scripted(vec![
        factverse_core::StubReply::text("Venus spins backwards compared to most planets."),
        factverse_core::StubReply::text("Venus spins backwards compared to most planets."),
        factverse_core::StubReply::text("A teaspoon of neutron star weighs billions of tons."),
    ]);
    let mut provider = FactProvider::new(bananas())
        .with_remote(RemoteFactClient::new(stub).with_settings(fast_settings()));

    let first = provider.get_fact("fun", true).await;
    let second = provider.get_fact("fun", true).await;
    assert_eq!(first.provenance, Provenance::Remote);
    assert_eq!(second.provenance, Provenance::Remote);
    assert_ne!(first.text, second.text);
}
