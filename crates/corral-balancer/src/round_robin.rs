use corral_core::{RegistryError, Result, SelectionPolicy};

/// Cycles through the keys in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    position: usize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next call to `select` will start from.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl SelectionPolicy for RoundRobin {
    fn select<'a>(&mut self, keys: &'a [String]) -> Result<&'a str> {
        if keys.is_empty() {
            self.position = 0;
            return Err(RegistryError::EmptyRegistry);
        }

        // the key list may have shrunk without a `resize` call
        let index = self.position % keys.len();
        self.position = (index + 1) % keys.len();
        Ok(&keys[index])
    }

    fn resize(&mut self, len: usize) {
        self.position = if len == 0 { 0 } else { self.position % len };
    }
}
