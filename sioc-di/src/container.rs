//! Core container implementation

use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::builder::ContainerBuilder;
use crate::catalog::Catalog;
use crate::config::{ContainerConfig, Lifetime};
use crate::error::{DiError, DiResult};
use crate::injectable::{Blueprint, Injectable, Recipe};
use crate::instance::{Abstraction, Instance};
use crate::key::Key;
use crate::registry::{Binding, Entry, Registry};
use crate::selector::{self, Attempt};

/// Dependency-injection container.
///
/// Registration takes `&mut self` and resolution takes `&self`, so all
/// registration happens before the container is shared.
pub struct Container {
    registry: Registry,
    catalog: Catalog,
    config: ContainerConfig,
}

/// Bookkeeping for one top-level resolution call
struct Resolution {
    /// Keys currently being built, outermost first
    path: Vec<Key>,
    detect_cycles: bool,
    max_depth: usize,
}

impl Resolution {
    fn new(config: &ContainerConfig) -> Self {
        Self {
            path: Vec::new(),
            detect_cycles: config.detect_cycles,
            max_depth: config.max_depth,
        }
    }

    fn enter(&mut self, key: Key) -> DiResult<()> {
        if self.detect_cycles && self.path.contains(&key) {
            let mut cycle: Vec<&str> = self.path.iter().map(Key::short_name).collect();
            cycle.push(key.short_name());
            return Err(DiError::CyclicDependency {
                path: cycle.join(" -> "),
            });
        }
        if self.path.len() >= self.max_depth {
            return Err(DiError::DepthExceeded {
                service: key.type_name(),
                limit: self.max_depth,
            });
        }
        self.path.push(key);
        Ok(())
    }

    fn leave(&mut self) {
        self.path.pop();
    }
}

impl Container {
    /// Create a container that knows every `injectable!` type
    pub fn new() -> Self {
        Self::from_parts(ContainerConfig::default())
    }

    /// Create a container and register the configured services
    pub fn with_config(config: ContainerConfig) -> DiResult<Self> {
        let config = config.validated()?;
        let services = config.services.clone();
        let mut container = Self::from_parts(config);
        for service in &services {
            let key = container.catalog.find_by_name(&service.service_type)?;
            debug!("Registering configured service {} as {}", key, service.lifetime);
            container.register_key(key, service.lifetime)?;
        }
        Ok(container)
    }

    fn from_parts(config: ContainerConfig) -> Self {
        let catalog = if config.include_declarations {
            Catalog::with_declarations()
        } else {
            Catalog::new()
        };
        Self {
            registry: Registry::new(),
            catalog,
            config,
        }
    }

    /// Create a new container builder
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// The configuration this container was built with
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Make `T` buildable by this container
    pub fn declare<T: Injectable>(&mut self) -> &mut Self {
        self.declare_with(Blueprint::<T>::of())
    }

    /// Make `T` buildable from an explicit blueprint, replacing any earlier one
    pub fn declare_with<T: Send + Sync + 'static>(&mut self, blueprint: Blueprint<T>) -> &mut Self {
        debug!("Declared {}", Key::of::<T>());
        self.catalog.insert(Arc::new(blueprint));
        self
    }

    /// Whether this container has a blueprint for `T`
    pub fn is_declared<T: ?Sized + 'static>(&self) -> bool {
        self.catalog.contains(Key::of::<T>())
    }

    /// Register an existing instance as the singleton for `T`
    pub fn register_instance<T>(&mut self, instance: Arc<T>) -> DiResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = Key::of::<T>();
        self.registry.insert(key, Entry::Singleton(Instance::new(instance)))?;
        debug!("Registered instance of {}", key);
        Ok(())
    }

    /// Register a value as the singleton for `T`
    pub fn register_value<T: Send + Sync + 'static>(&mut self, value: T) -> DiResult<()> {
        self.register_instance(Arc::new(value))
    }

    /// Register `T` as itself.
    ///
    /// A singleton is built immediately; a transient registration only
    /// records the binding and builds on every `resolve`.
    pub fn register_type<T: Send + Sync + 'static>(&mut self, singleton: bool) -> DiResult<()> {
        self.register_type_as::<T, T>(singleton)
    }

    /// Register `To` as the implementation of `From`
    pub fn register_type_as<From, To>(&mut self, singleton: bool) -> DiResult<()>
    where
        From: Abstraction<To> + ?Sized,
        To: Send + Sync + 'static,
    {
        self.register_binding(Key::of::<From>(), Binding::new::<From, To>(), singleton.into())
    }

    fn register_key(&mut self, key: Key, lifetime: Lifetime) -> DiResult<()> {
        self.register_binding(key, Binding::identity(key), lifetime)
    }

    fn register_binding(&mut self, key: Key, binding: Binding, lifetime: Lifetime) -> DiResult<()> {
        if self.registry.contains(key) {
            return Err(DiError::DuplicateRegistration {
                service: key.type_name(),
            });
        }

        let entry = match lifetime {
            Lifetime::Singleton => {
                let target = self.resolve_key(binding.target())?;
                Entry::Singleton(binding.upcast(&target)?)
            }
            Lifetime::Transient => Entry::Transient(binding),
        };
        self.registry.insert(key, entry)?;
        debug!("Registered {} -> {} ({})", key, binding.target(), lifetime);
        Ok(())
    }

    /// Resolve a fully built `T`
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve_key(Key::of::<T>())?.downcast::<T>()
    }

    /// Resolve by key, returning the type-erased instance
    pub fn resolve_key(&self, key: Key) -> DiResult<Instance> {
        let mut resolution = Resolution::new(&self.config);
        self.resolve_in(key, &mut resolution)
    }

    /// The singleton registered for `T`, without building anything
    pub fn lookup<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.registry
            .lookup(Key::of::<T>())
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// Whether `T` has a registration
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(Key::of::<T>())
    }

    /// Release every singleton, newest first.
    ///
    /// Returns the number of singletons released. Dropping the container
    /// has the same effect.
    pub fn dispose(mut self) -> usize {
        let released = self.registry.clear();
        debug!("Disposed container, released {} singletons", released);
        released
    }

    fn resolve_in(&self, key: Key, resolution: &mut Resolution) -> DiResult<Instance> {
        if let Some(instance) = self.registry.lookup(key) {
            trace!("Resolved singleton {}", key);
            return Ok(instance.clone());
        }

        resolution.enter(key)?;
        let result = self.build(key, resolution);
        resolution.leave();
        result
    }

    fn build(&self, key: Key, resolution: &mut Resolution) -> DiResult<Instance> {
        if let Some(binding) = self.registry.binding(key) {
            if binding.target() != key {
                trace!("Resolving {} through {}", key, binding.target());
                let target = self.resolve_in(binding.target(), resolution)?;
                return binding.upcast(&target);
            }
        }

        let recipe = self
            .catalog
            .get(key)
            .ok_or(DiError::NotRegisteredImplementation {
                service: key.type_name(),
            })?;
        self.construct(key, recipe.as_ref(), resolution)
    }

    fn construct(
        &self,
        key: Key,
        recipe: &dyn Recipe,
        resolution: &mut Resolution,
    ) -> DiResult<Instance> {
        let signatures = recipe.signatures();
        selector::select(key, &signatures, |index| {
            let params = signatures[index].params();
            let mut args = Vec::with_capacity(params.len());
            for &param in params {
                match self.resolve_in(param, resolution) {
                    Ok(value) => args.push(value),
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => return Ok(Attempt::Unsatisfied(err)),
                }
            }

            let built = recipe.build(index, args, &mut |property| {
                self.resolve_in(property, resolution)
            });
            match built {
                Ok(instance) => {
                    trace!("Built {} with constructor #{}", key, index);
                    Ok(Attempt::Built(instance))
                }
                Err(err) if err.is_fatal() => Err(err),
                Err(err) => Ok(Attempt::Unsatisfied(err)),
            }
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registry", &self.registry)
            .field("declared", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}
