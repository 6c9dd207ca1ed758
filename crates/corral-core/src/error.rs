use thiserror::Error;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry is full: capacity {capacity} reached")]
    CapacityExceeded { capacity: usize },
    #[error("key already exists: {0}")]
    DuplicateKey(String),
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("registry is empty")]
    EmptyRegistry,
    #[error("no free key found after {attempts} attempts")]
    KeyspaceExhausted { attempts: usize },
}
