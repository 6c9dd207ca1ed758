use crate::random::RandomSelection;
use crate::round_robin::RoundRobin;
use corral_core::SelectionPolicy;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The built-in selection strategies a [`Dispatcher`](crate::Dispatcher)
/// can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    RoundRobin,
    Random,
}

impl Strategy {
    /// Builds a fresh policy for this strategy.
    ///
    /// `seed` makes the random strategy deterministic; round-robin ignores it.
    pub fn policy(self, seed: Option<u64>) -> Box<dyn SelectionPolicy> {
        match self {
            Strategy::RoundRobin => Box::new(RoundRobin::new()),
            Strategy::Random => match seed {
                Some(seed) => Box::new(RandomSelection::seeded(seed)),
                None => Box::new(RandomSelection::new()),
            },
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::RoundRobin => write!(f, "round_robin"),
            Strategy::Random => write!(f, "random"),
        }
    }
}
