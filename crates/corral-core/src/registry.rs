use crate::error::{RegistryError, Result};
use crate::policy::AssignmentPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// A stored key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The key the value was registered under.
    pub key: String,
    /// The stored value.
    pub value: String,
}

/// Configures a [`BoundedRegistry`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RegistryConfig {
    /// Upper bound on the number of live entries.
    pub capacity: usize,
    /// Keep a value -> key index so that registering a known value
    /// returns its existing key instead of creating a second entry.
    #[builder(default = false)]
    pub index_values: bool,
}

/// A capacity-bounded mapping from keys to values.
///
/// Insertion order is preserved across removals and is what selection
/// policies see. The registry itself is not synchronized; owners wrap it
/// in a lock so that the capacity check, the key assignment and the insert
/// happen in one critical section.
#[derive(Debug, Clone)]
pub struct BoundedRegistry {
    capacity: usize,
    order: Vec<String>,
    by_key: HashMap<String, String>,
    by_value: Option<HashMap<String, String>>,
}

impl BoundedRegistry {
    /// Creates an empty registry from the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            capacity: config.capacity,
            order: Vec::with_capacity(config.capacity),
            by_key: HashMap::with_capacity(config.capacity),
            by_value: config
                .index_values
                .then(|| HashMap::with_capacity(config.capacity)),
        }
    }

    /// Creates an empty registry without a value index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(RegistryConfig::builder().capacity(capacity).build())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    /// Inserts `value` under `key`.
    ///
    /// Returns `Err(CapacityExceeded)` if the registry is full and
    /// `Err(DuplicateKey)` if `key` is already present.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        self.ensure_room()?;
        if self.by_key.contains_key(&key) {
            debug!(key = %key, "rejected duplicate key");
            return Err(RegistryError::DuplicateKey(key));
        }

        if let Some(index) = self.by_value.as_mut() {
            // the first key registered for a value stays the canonical one
            index.entry(value.clone()).or_insert_with(|| key.clone());
        }
        self.order.push(key.clone());
        self.by_key.insert(key.clone(), value);

        debug!(key = %key, len = self.order.len(), capacity = self.capacity, "added entry");
        Ok(())
    }

    /// Removes the entry stored under `key` and returns it.
    ///
    /// The relative order of the remaining entries is unchanged.
    pub fn remove(&mut self, key: &str) -> Result<Entry> {
        let Some(value) = self.by_key.remove(key) else {
            debug!(key = %key, "remove of unknown key");
            return Err(RegistryError::NotFound(key.to_owned()));
        };
        self.order.retain(|k| k != key);

        if let Some(index) = self.by_value.as_mut() {
            if index.get(&value).is_some_and(|k| k == key) {
                index.remove(&value);
                // hand the value over to the oldest remaining key that holds it
                if let Some(next) = self.order.iter().find(|k| self.by_key[*k] == value) {
                    index.insert(value.clone(), next.clone());
                }
            }
        }

        debug!(key = %key, len = self.order.len(), "removed entry");
        Ok(Entry {
            key: key.to_owned(),
            value,
        })
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.by_key
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| RegistryError::NotFound(key.to_owned()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys_in_order(&self) -> &[String] {
        &self.order
    }

    /// Returns an owned copy of the keys in insertion order.
    pub fn snapshot_keys_in_order(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Returns the key a value was registered under.
    ///
    /// Always `None` when the registry was built without a value index.
    pub fn find_key_by_value(&self, value: &str) -> Option<&str> {
        self.by_value.as_ref()?.get(value).map(String::as_str)
    }

    /// Returns all entries in insertion order.
    pub fn entries(&self) -> Vec<Entry> {
        self.order
            .iter()
            .map(|key| Entry {
                key: key.clone(),
                value: self.by_key[key].clone(),
            })
            .collect()
    }

    /// Registers `value` under a key produced by `policy`.
    ///
    /// With a value index, a value that is already present returns its
    /// existing key without consuming capacity. Otherwise the capacity is
    /// checked before the policy runs, so a full registry never asks the
    /// policy for a key.
    pub fn register<P>(&mut self, value: impl Into<String>, policy: &mut P) -> Result<String>
    where
        P: AssignmentPolicy + ?Sized,
    {
        let value = value.into();

        if let Some(key) = self.find_key_by_value(&value) {
            trace!(key = %key, "value already registered");
            return Ok(key.to_owned());
        }

        self.ensure_room()?;
        let key = policy.assign(self, &value)?;
        self.add(key.clone(), value)?;
        Ok(key)
    }

    fn ensure_room(&self) -> Result<()> {
        if self.is_full() {
            debug!(capacity = self.capacity, "registry is full");
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
