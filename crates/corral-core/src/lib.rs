//! Core types and traits for corral.
//!
//! This crate provides the capacity-bounded registry shared by the
//! dispatcher and the key store, together with the policy traits that
//! decide how keys are assigned and how entries are selected.

pub mod error;
pub mod policy;
pub mod registry;
pub mod shortkey;
pub mod shortener;

pub use error::{RegistryError, Result};
pub use policy::{AssignmentPolicy, SelectionPolicy};
pub use registry::{BoundedRegistry, Entry, RegistryConfig};
pub use shortkey::ShortKey;
pub use shortener::Shortener;
