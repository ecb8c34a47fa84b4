//! Cache manager - process-wide table of named datasets.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Typed handle to a namespace.
///
/// Pairs a namespace name with the container type stored under it, so
/// callers never spell out a downcast.
pub struct Namespace<T> {
    name: &'static str,
    _container: PhantomData<fn() -> T>,
}

impl<T> Namespace<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _container: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Central store of named in-memory datasets.
///
/// Each namespace holds one container behind an `Arc`. Containers are
/// replaced whole by [`set`](Self::set), so a reader holding a container
/// never observes a half-built one. Incremental updates go through the
/// container itself, which must be a concurrent type (`DashSet`, `DashMap`).
///
/// There is no eviction; namespaces live until invalidated or dropped
/// with the manager.
///
/// ## Example
///
/// ```rust
/// const BLACKLIST: Namespace<DashSet<i64>> = Namespace::new("blacklisted_users");
///
/// let cache = CacheManager::new();
/// cache.set(&BLACKLIST, DashSet::new());
///
/// let blacklist = cache.ensure(&BLACKLIST, DashSet::new);
/// blacklist.insert(42);
/// ```
#[derive(Clone)]
pub struct CacheManager {
    namespaces: Arc<RwLock<HashMap<&'static str, Slot>>>,
}

/// Type-erased container plus the type name it was stored with.
struct Slot {
    container: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Slot {
    fn new<T: Send + Sync + 'static>(container: Arc<T>) -> Self {
        Self {
            container,
            type_name: std::any::type_name::<T>(),
        }
    }

    fn downcast<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        match Arc::clone(&self.container).downcast::<T>() {
            Ok(container) => Some(container),
            Err(_) => {
                warn!(
                    "Namespace '{}' holds {}, not {}",
                    name,
                    self.type_name,
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }
}

impl CacheManager {
    /// Create a new empty cache manager.
    pub fn new() -> Self {
        info!("Cache manager initialized");
        Self {
            namespaces: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the container stored under a namespace.
    ///
    /// Returns `None` if the namespace is absent or holds a different type.
    pub fn get<T>(&self, namespace: &Namespace<T>) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let namespaces = self.namespaces.read();
        namespaces
            .get(namespace.name())
            .and_then(|slot| slot.downcast(namespace.name()))
    }

    /// Replace a namespace's container, returning the stored handle.
    pub fn set<T>(&self, namespace: &Namespace<T>, container: T) -> Arc<T>
    where
        T: Send + Sync + 'static,
    {
        let container = Arc::new(container);
        self.namespaces
            .write()
            .insert(namespace.name(), Slot::new(Arc::clone(&container)));

        debug!("Populated namespace: {}", namespace.name());
        container
    }

    /// Get a namespace's container, inserting `default()` if absent.
    ///
    /// A namespace holding the wrong type is replaced by the default.
    pub fn ensure<T, F>(&self, namespace: &Namespace<T>, default: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        if let Some(container) = self.get(namespace) {
            return container;
        }

        let mut namespaces = self.namespaces.write();

        // Another writer may have won the race between the two locks.
        if let Some(container) = namespaces
            .get(namespace.name())
            .and_then(|slot| slot.downcast(namespace.name()))
        {
            return container;
        }

        debug!("Creating namespace: {}", namespace.name());

        let container = Arc::new(default());
        namespaces.insert(namespace.name(), Slot::new(Arc::clone(&container)));
        container
    }

    /// Drop a namespace.
    ///
    /// Returns `true` if the namespace existed.
    #[allow(dead_code)]
    pub fn invalidate(&self, name: &str) -> bool {
        let removed = self.namespaces.write().remove(name).is_some();
        if removed {
            debug!("Invalidated namespace: {}", name);
        }
        removed
    }

    /// Check if a namespace is populated.
    #[allow(dead_code)]
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.read().contains_key(name)
    }

    /// Get the number of populated namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.read().len()
    }

    /// Check if no namespace is populated.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.namespaces.read().is_empty()
    }

    /// Names of all populated namespaces, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.namespaces.read().keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("namespaces", &self.names())
            .finish()
    }
}
