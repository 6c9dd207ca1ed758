//! Instance dispatching over a capacity-bounded registry.
//!
//! A [`Dispatcher`] keeps up to ten backend instance identifiers and hands
//! one back per [`Dispatcher::next`] call, chosen by the active
//! [`SelectionPolicy`](corral_core::SelectionPolicy).
//!
//! ```rust
//! use corral_balancer::{Dispatcher, DispatcherSettings, Strategy};
//!
//! # fn example() -> Result<(), corral_core::RegistryError> {
//! let dispatcher = Dispatcher::with_instances(
//!     DispatcherSettings::default(),
//!     ["instance1", "instance2", "instance3"],
//! )?;
//!
//! assert_eq!(dispatcher.next()?, "instance1");
//! assert_eq!(dispatcher.next()?, "instance2");
//!
//! dispatcher.set_strategy(Strategy::Random);
//! let picked = dispatcher.next()?;
//! assert!(dispatcher.contains(&picked));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod dispatcher;
pub mod random;
pub mod round_robin;
pub mod strategy;

pub use dispatcher::{Dispatcher, DispatcherSettings, DEFAULT_MAX_INSTANCES};
pub use random::RandomSelection;
pub use round_robin::RoundRobin;
pub use strategy::Strategy;
