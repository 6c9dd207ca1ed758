use corral_core::{AssignmentPolicy, BoundedRegistry, RegistryError, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

/// Picks keys uniformly at random from a predefined pool.
///
/// Keys already present in the registry are skipped. Once every pool key
/// is taken the policy reports `KeyspaceExhausted`.
pub struct KeyPool<R = StdRng> {
    keys: Vec<String>,
    rng: R,
}

impl KeyPool<StdRng> {
    /// Creates a pool seeded from the operating system.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::with_rng(keys, StdRng::from_os_rng())
    }

    /// Creates a pool whose picks are fully determined by `seed`.
    pub fn seeded<I, K>(keys: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::with_rng(keys, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> KeyPool<R> {
    /// Creates a pool backed by the given random source.
    ///
    /// Repeated keys are kept once so that every distinct key is equally
    /// likely to be picked.
    pub fn with_rng<I, K>(keys: I, rng: R) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique, rng }
    }

    /// Number of distinct keys in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<R> std::fmt::Debug for KeyPool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPool")
            .field("keys", &self.keys.len())
            .finish_non_exhaustive()
    }
}

impl<R: Rng + Send + 'static> AssignmentPolicy for KeyPool<R> {
    fn assign(&mut self, registry: &BoundedRegistry, _value: &str) -> Result<String> {
        let free: Vec<&String> = self
            .keys
            .iter()
            .filter(|key| !registry.contains(key))
            .collect();

        match free.choose(&mut self.rng) {
            Some(key) => {
                trace!(key = %key, free = free.len(), "picked pool key");
                Ok((*key).clone())
            }
            None => {
                warn!(pool = self.keys.len(), "key pool exhausted");
                Err(RegistryError::KeyspaceExhausted {
                    attempts: self.keys.len(),
                })
            }
        }
    }
}
