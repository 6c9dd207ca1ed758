//! Assignment policies for [`BoundedRegistry`](corral_core::BoundedRegistry).
//!
//! Each policy decides which key a newly registered value is stored under:
//!
//! - [`SequentialIndex`] uses the caller-supplied identifier as its own key.
//! - [`RandomToken`] draws fixed-length alphanumeric tokens, retrying on
//!   collision up to a bound.
//! - [`KeyPool`] picks a free key out of a predefined pool.

pub mod pool;
pub mod sequential;
pub mod token;

pub use corral_core::AssignmentPolicy;
pub use pool::KeyPool;
pub use sequential::SequentialIndex;
pub use token::{RandomToken, TokenSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_TOKEN_LENGTH};
