use corral_core::{RegistryError, ShortKey, Shortener};
use corral_keystore::{KeyStore, KeyStoreSettings};
use std::collections::HashSet;
use std::sync::Arc;

fn seeded_store(seed: u64) -> KeyStore {
    KeyStore::new(KeyStoreSettings::builder().seed(seed).build())
}

#[test]
fn capacity_hundred_scenario() {
    let store = seeded_store(101);

    let token = store.shorten("a").unwrap();
    assert_eq!(token.as_str().len(), 6);
    assert_eq!(store.resolve(token.as_str()).unwrap(), "a");
    assert_eq!(store.shorten("a").unwrap(), token);

    for i in 1..100 {
        store.shorten(&format!("example{i}.com")).unwrap();
    }
    assert_eq!(store.len(), 100);

    let err = store.shorten("example101.com").unwrap_err();
    assert_eq!(err, RegistryError::CapacityExceeded { capacity: 100 });
    assert!(err.to_string().contains("capacity 100"));

    // known values still resolve to their key once the store is full
    assert_eq!(store.shorten("a").unwrap(), token);
    assert_eq!(store.len(), 100);
}

#[test]
fn every_key_is_unique_and_resolves() {
    let store = seeded_store(7);

    let keys: Vec<ShortKey> = (0..100)
        .map(|i| store.shorten(&format!("https://example.com/{i}")).unwrap())
        .collect();

    let distinct: HashSet<&ShortKey> = keys.iter().collect();
    assert_eq!(distinct.len(), 100);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            store.resolve(key.as_str()).unwrap(),
            format!("https://example.com/{i}")
        );
    }
}

#[test]
fn same_seed_same_keys() {
    let first = seeded_store(55);
    let second = seeded_store(55);

    for value in ["one", "two", "three"] {
        assert_eq!(first.shorten(value).unwrap(), second.shorten(value).unwrap());
    }
}

#[test]
fn tiny_keyspace_reports_exhaustion() {
    // 62 one-character keys, but room for more values than that
    let store = KeyStore::new(
        KeyStoreSettings::builder()
            .capacity(100)
            .token_length(1)
            .max_attempts(500)
            .seed(13)
            .build(),
    );

    let mut stored = 0;
    let err = loop {
        match store.shorten(&format!("value-{stored}")) {
            Ok(_) => stored += 1,
            Err(err) => break err,
        }
    };

    assert_eq!(err, RegistryError::KeyspaceExhausted { attempts: 500 });
    assert!(stored <= 62);
    assert_eq!(store.len(), stored);
}

#[test]
fn concurrent_shortens_never_exceed_capacity() {
    let store = KeyStore::new(KeyStoreSettings::builder().capacity(50).seed(17).build());

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = &store;
                scope.spawn(move || {
                    (0..20)
                        .map(|i| store.shorten(&format!("worker{worker}-value{i}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let stored: Vec<&ShortKey> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(stored.len(), 50);
    assert_eq!(stored.iter().collect::<HashSet<_>>().len(), 50);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == RegistryError::CapacityExceeded { capacity: 50 }));
    assert_eq!(store.len(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_shortens_of_one_value_share_a_key() {
    let shortener: Arc<dyn Shortener> = Arc::new(seeded_store(23));

    let mut handles = vec![];
    for _ in 0..16 {
        let shortener = Arc::clone(&shortener);
        handles.push(tokio::spawn(async move {
            shortener.shorten("https://example.com").await.unwrap()
        }));
    }

    let mut keys = HashSet::new();
    for handle in handles {
        keys.insert(handle.await.unwrap());
    }
    assert_eq!(keys.len(), 1);

    let key = keys.into_iter().next().unwrap();
    assert_eq!(shortener.resolve(&key).await.unwrap(), "https://example.com");
}
