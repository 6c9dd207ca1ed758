use crate::strategy::Strategy;
use corral_core::{BoundedRegistry, Result, SelectionPolicy};
use corral_generator::SequentialIndex;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_INSTANCES: usize = 10;

/// Configures a [`Dispatcher`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct DispatcherSettings {
    /// Maximum number of registered instances.
    #[builder(default = DEFAULT_MAX_INSTANCES)]
    pub capacity: usize,
    /// Strategy active right after construction.
    #[builder(default)]
    pub strategy: Strategy,
    /// Seed for the random strategy. `None` seeds from the operating system.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

struct Selector {
    /// `None` when a custom policy was installed.
    strategy: Option<Strategy>,
    policy: Box<dyn SelectionPolicy>,
}

/// Hands out backend instances from a bounded pool.
///
/// Instances are keyed by their own identifier. The registry sits behind a
/// read/write lock and the selection policy behind a mutex; every method
/// takes the registry lock first, so a selection always sees a complete
/// instance list and a removal clamps the round-robin cursor before the
/// next selection can run.
pub struct Dispatcher {
    registry: RwLock<BoundedRegistry>,
    selector: Mutex<Selector>,
    seed: Option<u64>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new(settings: DispatcherSettings) -> Self {
        Self {
            registry: RwLock::new(BoundedRegistry::with_capacity(settings.capacity)),
            selector: Mutex::new(Selector {
                strategy: Some(settings.strategy),
                policy: settings.strategy.policy(settings.seed),
            }),
            seed: settings.seed,
        }
    }

    /// Creates a dispatcher pre-populated with `instances`, in order.
    ///
    /// Returns `Err(CapacityExceeded)` if there are more instances than the
    /// capacity allows and `Err(DuplicateKey)` if an identifier repeats.
    pub fn with_instances<I, S>(settings: DispatcherSettings, instances: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dispatcher = Self::new(settings);
        for instance in instances {
            dispatcher.add_instance(instance)?;
        }
        Ok(dispatcher)
    }

    /// Registers a new instance at the end of the rotation.
    pub fn add_instance(&self, id: impl Into<String>) -> Result<()> {
        let mut registry = self.registry.write();
        let id = registry.register(id, &mut SequentialIndex)?;
        info!(instance = %id, instances = registry.len(), "instance added");
        Ok(())
    }

    /// Removes an instance from the rotation.
    pub fn remove_instance(&self, id: &str) -> Result<()> {
        let mut registry = self.registry.write();
        registry.remove(id)?;
        self.selector.lock().policy.resize(registry.len());
        info!(instance = %id, instances = registry.len(), "instance removed");
        Ok(())
    }

    /// Switches to one of the built-in strategies.
    ///
    /// The new policy starts from a fresh state, so round-robin restarts at
    /// the first instance.
    pub fn set_strategy(&self, strategy: Strategy) {
        let mut selector = self.selector.lock();
        selector.strategy = Some(strategy);
        selector.policy = strategy.policy(self.seed);
        debug!(strategy = %strategy, "strategy changed");
    }

    /// Installs a custom selection policy.
    pub fn set_policy(&self, policy: impl SelectionPolicy) {
        let mut selector = self.selector.lock();
        selector.strategy = None;
        selector.policy = Box::new(policy);
        debug!("custom selection policy installed");
    }

    /// The active built-in strategy, or `None` for a custom policy.
    pub fn strategy(&self) -> Option<Strategy> {
        self.selector.lock().strategy
    }

    /// Picks the next instance according to the active policy.
    ///
    /// Returns `Err(EmptyRegistry)` if no instance is registered.
    pub fn next(&self) -> Result<String> {
        let registry = self.registry.read();
        let mut selector = self.selector.lock();
        let key = selector.policy.select(registry.keys_in_order())?;
        let instance = registry.get(key)?.to_owned();
        trace!(instance = %instance, "instance selected");
        Ok(instance)
    }

    /// Registered instances in rotation order.
    pub fn instances(&self) -> Vec<String> {
        self.registry.read().snapshot_keys_in_order()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.read().contains(id)
    }

    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.registry.read().capacity()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("instances", &self.instances())
            .field("strategy", &self.strategy())
            .finish_non_exhaustive()
    }
}
