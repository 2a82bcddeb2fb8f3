use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::RwLock,
};

use log::trace;

use crate::item::CacheItem;

/// A registry mapping canonical URIs to the single live instance per record.
///
/// Instances of different entity types are held in separate maps, so one URI
/// can never be resolved as two different types by accident. An instance is
/// registered at construction time, before its representation is fetched,
/// which is what lets concurrent lookups during a fetch still converge on one
/// instance.
pub struct EntityRegistry {
    entries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry").finish()
    }
}

impl EntityRegistry {
    /// Creates a new empty `EntityRegistry`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        EntityRegistry {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the instance registered under `uri`, or registers the result
    /// of `make` and returns that.
    ///
    /// Repeated calls with the same URI yield clones sharing one underlying
    /// instance; `make` runs at most once per registered URI.
    pub fn get_or_create<T: CacheItem + Clone>(&self, uri: &str, make: impl FnOnce() -> T) -> T {
        let mut entries = self
            .entries
            .write()
            .expect("RwLock should not be poisoned");
        let slot = entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashMap::<String, T>::new()));
        let map = slot
            .downcast_mut::<HashMap<String, T>>()
            .expect("slot holds the map for its own TypeId");
        match map.get(uri) {
            Some(existing) => existing.clone(),
            None => {
                trace!("registering {} at {uri}", T::NAME);
                let created = make();
                map.insert(uri.to_owned(), created.clone());
                created
            }
        }
    }

    /// Returns the instance registered under `uri`, if any.
    pub fn get<T: CacheItem + Clone>(&self, uri: &str) -> Option<T> {
        self.entries
            .read()
            .expect("RwLock should not be poisoned")
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<HashMap<String, T>>())
            .and_then(|map| map.get(uri))
            .cloned()
    }

    /// Drops the registration for `uri`, so the next lookup constructs a
    /// fresh instance. Returns whether an entry existed.
    ///
    /// Registration is keyed by the exact URI string. Artifact URIs may carry
    /// a `state` query parameter, so two URIs naming the same logical record
    /// at different states are registered separately; `forget` is the
    /// maintenance hatch for callers that want to re-fetch under such a key.
    pub fn forget<T: CacheItem>(&self, uri: &str) -> bool {
        self.entries
            .write()
            .expect("RwLock should not be poisoned")
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_mut::<HashMap<String, T>>())
            .map(|map| map.remove(uri).is_some())
            .unwrap_or(false)
    }

    /// Number of registered instances of `T`.
    pub fn len<T: CacheItem>(&self) -> usize {
        self.entries
            .read()
            .expect("RwLock should not be poisoned")
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<HashMap<String, T>>())
            .map(|map| map.len())
            .unwrap_or(0)
    }
}
