use corral_core::{AssignmentPolicy, BoundedRegistry, Result};

/// Keys entries by the identifier the caller registers.
///
/// Used for slot-style registries such as a dispatcher's instance list,
/// where the instance id is already unique and its position is implied by
/// insertion order. Uniqueness is enforced by the registry's duplicate-key
/// check, so no retry is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIndex;

impl SequentialIndex {
    pub fn new() -> Self {
        Self
    }
}

impl AssignmentPolicy for SequentialIndex {
    fn assign(&mut self, _registry: &BoundedRegistry, value: &str) -> Result<String> {
        Ok(value.to_owned())
    }
}
