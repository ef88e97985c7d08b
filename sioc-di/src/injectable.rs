//! Construction metadata for injectable types
//!
//! A [`Blueprint`] lists every constructor and tagged property of a type.
//! Types provide one by implementing [`Injectable`]; the [`injectable!`]
//! macro additionally submits a [`Declaration`] so that every container
//! knows how to build the type without being told explicitly.
//!
//! [`injectable!`]: crate::injectable

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::constructor::{Constructor, Signature};
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::Key;
use crate::property::Property;

/// Types that describe their own construction paths.
///
/// ```
/// use std::sync::Arc;
/// use sioc_di::{Constructor, Injectable};
///
/// struct Repository;
/// struct Service { repo: Arc<Repository> }
///
/// impl Injectable for Service {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|(repo,): (Arc<Repository>,)| Service { repo })]
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// All constructors the container may choose from
    fn constructors() -> Vec<Constructor<Self>>;

    /// Properties to fill after construction
    fn properties() -> Vec<Property<Self>> {
        Vec::new()
    }
}

/// Every constructor and tagged property of `T`
pub struct Blueprint<T> {
    constructors: Vec<Constructor<T>>,
    properties: Vec<Property<T>>,
}

impl<T: Send + Sync + 'static> Blueprint<T> {
    /// An empty blueprint; add constructors and properties with the builder methods
    pub fn new() -> Self {
        Self {
            constructors: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// The blueprint an [`Injectable`] type declares for itself
    pub fn of() -> Self
    where
        T: Injectable,
    {
        Self {
            constructors: T::constructors(),
            properties: T::properties(),
        }
    }

    /// Add a constructor
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a tagged property
    pub fn property(mut self, property: Property<T>) -> Self {
        self.properties.push(property);
        self
    }

    /// Declared constructors
    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// Declared properties
    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }
}

impl<T: Send + Sync + 'static> Default for Blueprint<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Blueprint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("service", &std::any::type_name::<T>())
            .field("constructors", &self.constructors)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Type-erased blueprint as seen by the resolver
pub(crate) trait Recipe: Send + Sync {
    /// Key of the type this recipe builds
    fn key(&self) -> Key;

    /// Constructor signatures, indexed the same way as `build`
    fn signatures(&self) -> Vec<&Signature>;

    /// Run constructor `index` with resolved arguments, then fill every
    /// tagged property through `resolve`
    fn build(
        &self,
        index: usize,
        args: Vec<Instance>,
        resolve: &mut dyn FnMut(Key) -> DiResult<Instance>,
    ) -> DiResult<Instance>;
}

impl<T: Send + Sync + 'static> Recipe for Blueprint<T> {
    fn key(&self) -> Key {
        Key::of::<T>()
    }

    fn signatures(&self) -> Vec<&Signature> {
        self.constructors.iter().map(Constructor::signature).collect()
    }

    fn build(
        &self,
        index: usize,
        args: Vec<Instance>,
        resolve: &mut dyn FnMut(Key) -> DiResult<Instance>,
    ) -> DiResult<Instance> {
        let constructor = self
            .constructors
            .get(index)
            .ok_or(DiError::NotRegisteredImplementation {
                service: std::any::type_name::<T>(),
            })?;
        let mut value = constructor.build(args)?;

        for property in &self.properties {
            trace!(
                "Injecting property {}.{} ({})",
                std::any::type_name::<T>(),
                property.name(),
                property.key()
            );
            let resolved = resolve(property.key())?;
            property.inject(&mut value, &resolved)?;
        }

        Ok(Instance::new(Arc::new(value)))
    }
}

/// A link-time record that makes a type buildable by every container.
///
/// Created by the [`injectable!`](crate::injectable) macro.
pub struct Declaration {
    key: fn() -> Key,
    recipe: fn() -> Arc<dyn Recipe>,
}

impl Declaration {
    /// Declaration for an [`Injectable`] type
    pub const fn of<T: Injectable>() -> Self {
        Self {
            key: Key::of::<T>,
            recipe: recipe_of::<T>,
        }
    }

    /// Key of the declared type
    pub fn key(&self) -> Key {
        (self.key)()
    }

    pub(crate) fn recipe(&self) -> Arc<dyn Recipe> {
        (self.recipe)()
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Declaration").field(&self.key()).finish()
    }
}

fn recipe_of<T: Injectable>() -> Arc<dyn Recipe> {
    Arc::new(Blueprint::<T>::of())
}

inventory::collect!(Declaration);

/// Iterate over every type submitted with [`injectable!`](crate::injectable)
pub fn declarations() -> impl Iterator<Item = &'static Declaration> {
    inventory::iter::<Declaration>.into_iter()
}

/// Make types resolvable by every container without explicit registration.
///
/// Each type must implement [`Injectable`].
///
/// ```
/// use sioc_di::{injectable, Constructor, Container, Injectable};
///
/// struct Clock;
///
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::nullary(|| Clock)]
///     }
/// }
///
/// injectable!(Clock);
///
/// fn main() {
///     let container = Container::new();
///     assert!(container.resolve::<Clock>().is_ok());
/// }
/// ```
#[macro_export]
macro_rules! injectable {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::inventory::submit! {
                $crate::Declaration::of::<$ty>()
            }
        )+
    };
}
