//! Container builder for fluent configuration

use std::sync::Arc;

use crate::config::{ContainerConfig, Lifetime};
use crate::container::Container;
use crate::error::DiResult;
use crate::injectable::{Blueprint, Injectable};
use crate::instance::Abstraction;

type Step = Box<dyn FnOnce(&mut Container) -> DiResult<()>>;

/// Builder for constructing a container.
///
/// Registrations are replayed in the order they were added, so a singleton
/// sees every instance and declaration registered before it.
pub struct ContainerBuilder {
    config: ContainerConfig,
    steps: Vec<Step>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Use `config`; its services are registered before anything added here
    pub fn config(&mut self, config: ContainerConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Make an [`Injectable`] type buildable
    pub fn declare<T: Injectable>(&mut self) -> &mut Self {
        self.step(|container| {
            container.declare::<T>();
            Ok(())
        })
    }

    /// Make `T` buildable from an explicit blueprint
    pub fn declare_with<T: Send + Sync + 'static>(&mut self, blueprint: Blueprint<T>) -> &mut Self {
        self.step(move |container| {
            container.declare_with(blueprint);
            Ok(())
        })
    }

    /// Register an existing instance as a singleton
    pub fn instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.step(move |container| container.register_instance(instance))
    }

    /// Register a value as a singleton
    pub fn value<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.step(move |container| container.register_value(value))
    }

    /// Register `T` as a singleton built from its blueprint
    pub fn singleton<T: Send + Sync + 'static>(&mut self) -> &mut Self {
        self.step(|container| container.register_type::<T>(true))
    }

    /// Register `T` as transient
    pub fn transient<T: Send + Sync + 'static>(&mut self) -> &mut Self {
        self.step(|container| container.register_type::<T>(false))
    }

    /// Bind `To` as the implementation of `From`
    pub fn bind<From, To>(&mut self, lifetime: Lifetime) -> &mut Self
    where
        From: Abstraction<To> + ?Sized,
        To: Send + Sync + 'static,
    {
        self.step(move |container| {
            container.register_type_as::<From, To>(lifetime.is_singleton())
        })
    }

    fn step(&mut self, step: impl FnOnce(&mut Container) -> DiResult<()> + 'static) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Build the container, stopping at the first failed registration
    pub fn build(self) -> DiResult<Container> {
        let mut container = Container::with_config(self.config)?;
        for step in self.steps {
            step(&mut container)?;
        }
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension methods for fluent builder pattern
impl ContainerBuilder {
    /// Add multiple services using a configuration function
    pub fn add_services<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        configure(&mut self);
        self
    }

    /// Add services from another module
    pub fn add_module<M: Module>(mut self, module: M) -> Self {
        module.configure(&mut self);
        self
    }
}

/// Trait for service modules
pub trait Module {
    /// Configure services for this module
    fn configure(&self, builder: &mut ContainerBuilder);
}
