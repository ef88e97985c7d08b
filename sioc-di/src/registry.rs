//! Singleton and binding registry

use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::{DiError, DiResult};
use crate::instance::{Abstraction, Instance};
use crate::key::Key;

/// A recorded transient redirect from an abstraction to a concrete type
#[derive(Clone, Copy)]
pub struct Binding {
    target: Key,
    upcast: fn(&Instance) -> DiResult<Instance>,
}

impl Binding {
    /// Binding that builds `To` and hands it out as `From`
    pub fn new<From, To>() -> Self
    where
        From: Abstraction<To> + ?Sized,
        To: ?Sized + Send + Sync + 'static,
    {
        Self {
            target: Key::of::<To>(),
            upcast: upcast::<From, To>,
        }
    }

    /// Binding of a key to itself, for registrations known only by key
    pub fn identity(key: Key) -> Self {
        Self {
            target: key,
            upcast: |instance| Ok(instance.clone()),
        }
    }

    /// Key of the concrete type that is actually built
    pub fn target(&self) -> Key {
        self.target
    }

    /// View a built target instance as the bound abstraction
    pub fn upcast(&self, instance: &Instance) -> DiResult<Instance> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("target", &self.target).finish()
    }
}

fn upcast<From, To>(instance: &Instance) -> DiResult<Instance>
where
    From: Abstraction<To> + ?Sized,
    To: ?Sized + Send + Sync + 'static,
{
    let concrete = instance.downcast::<To>()?;
    Ok(Instance::new(From::upcast(concrete)))
}

/// A registry entry
#[derive(Debug, Clone)]
pub enum Entry {
    /// One instance, returned for every resolution of the key
    Singleton(Instance),
    /// Built fresh on every resolution
    Transient(Binding),
}

/// Maps requested keys to their registration.
///
/// Holds at most one entry per key and never replaces an entry once it has
/// been inserted.
#[derive(Default)]
pub struct Registry {
    entries: FxHashMap<Key, Entry>,
    /// Registration order, so singletons can be released in reverse
    order: Vec<Key>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, failing if the key already has one
    pub fn insert(&mut self, key: Key, entry: Entry) -> DiResult<()> {
        if self.entries.contains_key(&key) {
            return Err(DiError::DuplicateRegistration {
                service: key.type_name(),
            });
        }
        self.entries.insert(key, entry);
        self.order.push(key);
        Ok(())
    }

    /// The singleton registered under `key`, if any
    pub fn lookup(&self, key: Key) -> Option<&Instance> {
        match self.entries.get(&key) {
            Some(Entry::Singleton(instance)) => Some(instance),
            _ => None,
        }
    }

    /// The transient binding registered under `key`, if any
    pub fn binding(&self, key: Key) -> Option<&Binding> {
        match self.entries.get(&key) {
            Some(Entry::Transient(binding)) => Some(binding),
            _ => None,
        }
    }

    /// Whether `key` has any entry
    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, oldest first
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.order.iter().copied()
    }

    /// Drop every entry, singletons in reverse registration order.
    ///
    /// Returns the number of singletons released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        while let Some(key) = self.order.pop() {
            if let Some(Entry::Singleton(instance)) = self.entries.remove(&key) {
                drop(instance);
                released += 1;
            }
        }
        self.entries.clear();
        released
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.keys().map(|key| (key, &self.entries[&key])))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    struct Square;

    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    crate::implements!(dyn Shape: Square);

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = Registry::new();
        let value = Arc::new(42u32);
        registry
            .insert(Key::of::<u32>(), Entry::Singleton(Instance::new(value.clone())))
            .unwrap();

        let found = registry.lookup(Key::of::<u32>()).unwrap();
        assert!(Arc::ptr_eq(&found.downcast::<u32>().unwrap(), &value));
        assert!(registry.lookup(Key::of::<u64>()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = Registry::new();
        registry
            .insert(Key::of::<u32>(), Entry::Singleton(Instance::new(Arc::new(1u32))))
            .unwrap();

        let err = registry
            .insert(Key::of::<u32>(), Entry::Singleton(Instance::new(Arc::new(2u32))))
            .unwrap_err();
        assert_eq!(err, DiError::DuplicateRegistration { service: "u32" });

        let kept = registry.lookup(Key::of::<u32>()).unwrap();
        assert_eq!(*kept.downcast::<u32>().unwrap(), 1);
    }

    #[test]
    fn test_binding_is_not_a_singleton() {
        let mut registry = Registry::new();
        registry
            .insert(
                Key::of::<dyn Shape>(),
                Entry::Transient(Binding::new::<dyn Shape, Square>()),
            )
            .unwrap();

        assert!(registry.lookup(Key::of::<dyn Shape>()).is_none());
        let binding = registry.binding(Key::of::<dyn Shape>()).unwrap();
        assert_eq!(binding.target(), Key::of::<Square>());

        let shape = binding
            .upcast(&Instance::new(Arc::new(Square)))
            .unwrap()
            .downcast::<dyn Shape>()
            .unwrap();
        assert_eq!(shape.sides(), 4);
    }

    #[test]
    fn test_clear_counts_singletons() {
        let mut registry = Registry::new();
        registry
            .insert(Key::of::<u8>(), Entry::Singleton(Instance::new(Arc::new(1u8))))
            .unwrap();
        registry
            .insert(Key::of::<Square>(), Entry::Transient(Binding::new::<Square, Square>()))
            .unwrap();

        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            vec![Key::of::<u8>(), Key::of::<Square>()]
        );
        assert_eq!(registry.clear(), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.keys().count(), 0);
    }
}
