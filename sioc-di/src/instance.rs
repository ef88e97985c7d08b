//! Type-erased service instances and abstraction upcasts

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// A resolved service with its concrete type erased.
///
/// The handle owns an `Arc<T>` (so `T` may be `dyn Trait`). Cloning the
/// handle shares the same allocation; it never clones the service itself.
#[derive(Clone)]
pub struct Instance {
    key: Key,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wrap a shared service
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            key: Key::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Key of the type held by this instance
    pub fn key(&self) -> Key {
        self.key
    }

    /// Recover the typed handle
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: self.key.type_name(),
            })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type", &self.key).finish()
    }
}

/// Types that an `Arc<T>` can be viewed as.
///
/// Every type is an abstraction of itself. Trait objects opt in through the
/// [`implements!`](crate::implements) macro, which lets
/// `register_type_as::<dyn Trait, Concrete>` bind the two.
pub trait Abstraction<T: ?Sized>: Send + Sync + 'static {
    /// View a concrete service as `Self`
    fn upcast(instance: Arc<T>) -> Arc<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Abstraction<T> for T {
    fn upcast(instance: Arc<T>) -> Arc<T> {
        instance
    }
}

/// Declare that concrete types can be bound to a trait-object abstraction.
///
/// ```
/// use sioc_di::implements;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// implements!(dyn Clock: SystemClock);
/// ```
#[macro_export]
macro_rules! implements {
    ($abstraction:ty: $($concrete:ty),+ $(,)?) => {
        $(
            impl $crate::Abstraction<$concrete> for $abstraction {
                fn upcast(instance: ::std::sync::Arc<$concrete>) -> ::std::sync::Arc<Self> {
                    instance
                }
            }
        )+
    };
}
