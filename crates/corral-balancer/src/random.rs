use corral_core::{RegistryError, Result, SelectionPolicy};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Choose a key at random based on a uniform distribution.
pub struct RandomSelection<R = StdRng> {
    rng: R,
}

impl RandomSelection<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomSelection<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSelection<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> std::fmt::Debug for RandomSelection<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSelection").finish_non_exhaustive()
    }
}

impl<R: Rng + Send + 'static> SelectionPolicy for RandomSelection<R> {
    fn select<'a>(&mut self, keys: &'a [String]) -> Result<&'a str> {
        keys.choose(&mut self.rng)
            .map(String::as_str)
            .ok_or(RegistryError::EmptyRegistry)
    }
}
