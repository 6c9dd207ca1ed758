use crate::error::Result;
use crate::registry::BoundedRegistry;

/// Trait for producing the key a new value is registered under.
///
/// Implementations may consult the registry to avoid collisions, but must
/// not mutate it; the registry performs the insert itself once a key has
/// been assigned. Both steps run under the caller's write lock.
pub trait AssignmentPolicy: Send + 'static {
    /// Produces a key for `value` that is not yet present in `registry`.
    fn assign(&mut self, registry: &BoundedRegistry, value: &str) -> Result<String>;
}

/// Trait for choosing which existing entry to hand back when the caller
/// does not name a key.
pub trait SelectionPolicy: Send + 'static {
    /// Picks one key out of `keys`, which is in registry insertion order.
    ///
    /// Returns `Err(EmptyRegistry)` if `keys` is empty.
    fn select<'a>(&mut self, keys: &'a [String]) -> Result<&'a str>;

    /// Called after the registry shrank to `len` entries so that any
    /// stored position stays a valid index.
    fn resize(&mut self, _len: usize) {}
}

impl<P: AssignmentPolicy + ?Sized> AssignmentPolicy for Box<P> {
    fn assign(&mut self, registry: &BoundedRegistry, value: &str) -> Result<String> {
        (**self).assign(registry, value)
    }
}

impl<P: SelectionPolicy + ?Sized> SelectionPolicy for Box<P> {
    fn select<'a>(&mut self, keys: &'a [String]) -> Result<&'a str> {
        (**self).select(keys)
    }

    fn resize(&mut self, len: usize) {
        (**self).resize(len)
    }
}
