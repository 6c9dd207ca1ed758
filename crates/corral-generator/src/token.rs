use corral_core::{AssignmentPolicy, BoundedRegistry, RegistryError, Result};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_TOKEN_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Configures a [`RandomToken`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct TokenSettings {
    /// Number of characters in each token.
    #[builder(default = DEFAULT_TOKEN_LENGTH)]
    pub length: usize,
    /// Draws attempted before giving up with `KeyspaceExhausted`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws fixed-length tokens uniformly from `[A-Za-z0-9]`.
///
/// A drawn token that is already a key in the registry is redrawn. With 62
/// symbols and the default length the space holds about 5.6e10 tokens, so a
/// collision is rare, but termination is only probabilistic; after
/// `max_attempts` draws the policy reports `KeyspaceExhausted` instead of
/// looping on.
pub struct RandomToken<R = StdRng> {
    settings: TokenSettings,
    rng: R,
}

impl RandomToken<StdRng> {
    /// Creates a policy seeded from the operating system.
    pub fn new(settings: TokenSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Creates a policy whose tokens are fully determined by `seed`.
    pub fn seeded(settings: TokenSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomToken<R> {
    /// Creates a policy backed by the given random source.
    pub fn with_rng(settings: TokenSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    pub fn settings(&self) -> TokenSettings {
        self.settings
    }

    /// Draws one token without checking it against any registry.
    pub fn draw(&mut self) -> String {
        (0..self.settings.length)
            .map(|_| char::from(self.rng.sample(Alphanumeric)))
            .collect()
    }
}

impl<R> std::fmt::Debug for RandomToken<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomToken")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<R: Rng + Send + 'static> AssignmentPolicy for RandomToken<R> {
    fn assign(&mut self, registry: &BoundedRegistry, _value: &str) -> Result<String> {
        for attempt in 1..=self.settings.max_attempts {
            let token = self.draw();
            if !registry.contains(&token) {
                trace!(attempt, "drew free token");
                return Ok(token);
            }
            trace!(attempt, token = %token, "token collision, redrawing");
        }

        warn!(
            attempts = self.settings.max_attempts,
            length = self.settings.length,
            "no free token found"
        );
        Err(RegistryError::KeyspaceExhausted {
            attempts: self.settings.max_attempts,
        })
    }
}
