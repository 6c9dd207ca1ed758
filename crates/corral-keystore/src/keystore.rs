use async_trait::async_trait;
use corral_core::{
    AssignmentPolicy, BoundedRegistry, Entry, RegistryConfig, Result, ShortKey, Shortener,
};
use corral_generator::{RandomToken, TokenSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_TOKEN_LENGTH};
use parking_lot::RwLock;
use tracing::{debug, info, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_KEYS: usize = 100;

/// Configures a [`KeyStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct KeyStoreSettings {
    /// Maximum number of stored values.
    #[builder(default = DEFAULT_MAX_KEYS)]
    pub capacity: usize,
    /// Length of generated keys.
    #[builder(default = DEFAULT_TOKEN_LENGTH)]
    pub token_length: usize,
    /// Key draws attempted per value before giving up.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
    /// Seed for key generation. `None` seeds from the operating system.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
    /// Public prefix used by [`KeyStore::shorten_url`], e.g. `https://www.rev.me`.
    #[builder(default, setter(strip_option, into))]
    pub base_url: Option<String>,
}

impl Default for KeyStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KeyStoreSettings {
    fn token_settings(&self) -> TokenSettings {
        TokenSettings::builder()
            .length(self.token_length)
            .max_attempts(self.max_attempts)
            .build()
    }
}

struct State<P> {
    registry: BoundedRegistry,
    policy: P,
}

/// A bounded, in-memory store of short keys.
///
/// Keys are produced by an [`AssignmentPolicy`], [`RandomToken`] unless
/// another policy is supplied. Shortening holds the write lock across the
/// idempotency lookup, the capacity check, key generation and the insert,
/// so concurrent callers can neither overfill the store nor receive two
/// keys for the same value. Resolving only takes the read lock.
pub struct KeyStore<P = RandomToken> {
    state: RwLock<State<P>>,
    base_url: Option<String>,
}

impl KeyStore<RandomToken> {
    /// Creates a store that generates random alphanumeric keys.
    pub fn new(settings: KeyStoreSettings) -> Self {
        let policy = match settings.seed {
            Some(seed) => RandomToken::seeded(settings.token_settings(), seed),
            None => RandomToken::new(settings.token_settings()),
        };
        Self::with_policy(settings, policy)
    }
}

impl Default for KeyStore<RandomToken> {
    fn default() -> Self {
        Self::new(KeyStoreSettings::default())
    }
}

impl<P: AssignmentPolicy> KeyStore<P> {
    /// Creates a store that takes its keys from `policy`.
    ///
    /// `token_length`, `max_attempts` and `seed` only apply to the default
    /// random policy and are ignored here.
    pub fn with_policy(settings: KeyStoreSettings, policy: P) -> Self {
        let registry = BoundedRegistry::new(
            RegistryConfig::builder()
                .capacity(settings.capacity)
                .index_values(true)
                .build(),
        );
        Self {
            state: RwLock::new(State { registry, policy }),
            base_url: settings.base_url,
        }
    }

    /// Returns the key for `original`, generating one if it is new.
    ///
    /// Returns `Err(CapacityExceeded)` if the store is full and the value is
    /// not already in it, and `Err(KeyspaceExhausted)` if the policy could
    /// not find a free key.
    pub fn shorten(&self, original: &str) -> Result<ShortKey> {
        if let Some(key) = self.state.read().registry.find_key_by_value(original) {
            trace!(key = %key, "value already shortened");
            return Ok(ShortKey::new(key));
        }

        let mut state = self.state.write();
        let State { registry, policy } = &mut *state;
        let key = registry.register(original, policy)?;
        info!(key = %key, stored = registry.len(), "value shortened");
        Ok(ShortKey::new(key))
    }

    /// Like [`shorten`](Self::shorten), but renders the key as a full URL
    /// when a base URL is configured.
    pub fn shorten_url(&self, original: &str) -> Result<String> {
        let key = self.shorten(original)?;
        Ok(match &self.base_url {
            Some(base_url) => key.to_url(base_url),
            None => key.into_string(),
        })
    }

    /// Returns the original value stored under `key`.
    pub fn resolve(&self, key: &str) -> Result<String> {
        let state = self.state.read();
        match state.registry.get(key) {
            Ok(original) => {
                trace!(key = %key, "resolved key");
                Ok(original.to_owned())
            }
            Err(err) => {
                debug!(key = %key, "key not found");
                Err(err)
            }
        }
    }

    /// Resolves either a bare key or a URL produced by
    /// [`shorten_url`](Self::shorten_url).
    pub fn resolve_url(&self, short_url: &str) -> Result<String> {
        let key = self
            .base_url
            .as_deref()
            .and_then(|base_url| short_url.strip_prefix(base_url.trim_end_matches('/')))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(short_url);
        self.resolve(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.read().registry.contains(key)
    }

    /// Stored key/value pairs in the order they were shortened.
    pub fn entries(&self) -> Vec<Entry> {
        self.state.read().registry.entries()
    }

    pub fn len(&self) -> usize {
        self.state.read().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().registry.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.state.read().registry.capacity()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

impl<P> std::fmt::Debug for KeyStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("KeyStore")
            .field("len", &state.registry.len())
            .field("capacity", &state.registry.capacity())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: AssignmentPolicy + Sync> Shortener for KeyStore<P> {
    async fn shorten(&self, original: &str) -> Result<ShortKey> {
        KeyStore::shorten(self, original)
    }

    async fn resolve(&self, key: &ShortKey) -> Result<String> {
        KeyStore::resolve(self, key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_core::RegistryError;
    use corral_generator::KeyPool;
    use std::sync::Arc;

    fn test_store() -> KeyStore {
        KeyStore::new(KeyStoreSettings::builder().seed(101).build())
    }

    #[test]
    fn default_settings() {
        let settings = KeyStoreSettings::default();
        assert_eq!(settings.capacity, 100);
        assert_eq!(settings.token_length, 6);
        assert_eq!(settings.max_attempts, 1000);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.base_url, None);
    }

    #[test]
    fn shorten_produces_six_character_key() {
        let store = test_store();

        let key = store.shorten("example.com").unwrap();
        assert_eq!(key.as_str().len(), 6);
        assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn resolve_returns_original() {
        let store = test_store();

        let key = store.shorten("example1.com").unwrap();
        assert_eq!(store.resolve(key.as_str()).unwrap(), "example1.com");
    }

    #[test]
    fn resolve_unknown_key() {
        let store = test_store();

        assert_eq!(
            store.resolve("12345").unwrap_err(),
            RegistryError::NotFound("12345".to_string())
        );
    }

    #[test]
    fn distinct_values_get_distinct_keys() {
        let store = test_store();

        let first = store.shorten("example1.com").unwrap();
        let second = store.shorten("example2.com").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn shorten_is_idempotent() {
        let store = test_store();

        let first = store.shorten("a").unwrap();
        let second = store.shorten("a").unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn configured_token_length() {
        let store = KeyStore::new(KeyStoreSettings::builder().token_length(10).seed(1).build());
        assert_eq!(store.shorten("x").unwrap().as_str().len(), 10);
    }

    #[test]
    fn shorten_url_with_and_without_base() {
        let with_base = KeyStore::new(
            KeyStoreSettings::builder()
                .seed(3)
                .base_url("https://www.rev.me/")
                .build(),
        );
        let url = with_base.shorten_url("https://example.com").unwrap();
        assert!(url.starts_with("https://www.rev.me/"));
        assert_eq!(url.len(), "https://www.rev.me/".len() + 6);
        assert_eq!(with_base.resolve_url(&url).unwrap(), "https://example.com");

        let bare = test_store();
        let key = bare.shorten_url("https://example.com").unwrap();
        assert_eq!(key.len(), 6);
        assert_eq!(bare.resolve_url(&key).unwrap(), "https://example.com");
    }

    #[test]
    fn resolve_url_accepts_bare_key_with_base() {
        let store = KeyStore::new(
            KeyStoreSettings::builder()
                .seed(3)
                .base_url("https://www.rev.me")
                .build(),
        );
        let key = store.shorten("https://example.com").unwrap();
        assert_eq!(store.resolve_url(key.as_str()).unwrap(), "https://example.com");
    }

    #[test]
    fn pool_backed_store() {
        let store = KeyStore::with_policy(
            KeyStoreSettings::builder().capacity(5).build(),
            KeyPool::seeded(["k1", "k2"], 8),
        );

        let a = store.shorten("a").unwrap();
        let b = store.shorten("b").unwrap();
        assert_ne!(a, b);
        assert_eq!(
            store.shorten("c").unwrap_err(),
            RegistryError::KeyspaceExhausted { attempts: 2 }
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn entries_in_shorten_order() {
        let store = test_store();
        store.shorten("first").unwrap();
        store.shorten("second").unwrap();

        let values: Vec<_> = store.entries().into_iter().map(|e| e.value).collect();
        assert_eq!(values, ["first", "second"]);
    }

    #[tokio::test]
    async fn shortener_trait_object() {
        let shortener: Arc<dyn Shortener> = Arc::new(test_store());

        let key = shortener.shorten("https://example.com").await.unwrap();
        let again = shortener.shorten("https://example.com").await.unwrap();
        assert_eq!(key, again);
        assert_eq!(
            shortener.resolve(&key).await.unwrap(),
            "https://example.com"
        );
        assert!(matches!(
            shortener.resolve(&ShortKey::new("nope00")).await,
            Err(RegistryError::NotFound(_))
        ));
    }
}
