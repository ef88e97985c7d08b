//! Tagged properties filled after construction

use std::fmt;
use std::sync::Arc;

use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::Key;

type AssignFn<T> = Box<dyn Fn(&mut T, &Instance) -> DiResult<()> + Send + Sync>;

/// A settable member of `T` that the container resolves and assigns once
/// the value has been constructed.
pub struct Property<T> {
    name: &'static str,
    key: Key,
    assign: AssignFn<T>,
}

impl<T: 'static> Property<T> {
    /// Declare a property of type `Arc<P>`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sioc_di::Property;
    ///
    /// struct Metrics;
    /// struct Handler { metrics: Option<Arc<Metrics>> }
    ///
    /// let property = Property::new("metrics", |h: &mut Handler, m: Arc<Metrics>| {
    ///     h.metrics = Some(m)
    /// });
    /// assert_eq!(property.name(), "metrics");
    /// ```
    pub fn new<P, F>(name: &'static str, assign: F) -> Self
    where
        P: ?Sized + Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        Self {
            name,
            key: Key::of::<P>(),
            assign: Box::new(move |target: &mut T, value: &Instance| {
                assign(target, value.downcast::<P>()?);
                Ok(())
            }),
        }
    }

    /// Name of the member, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key of the declared property type
    pub fn key(&self) -> Key {
        self.key
    }

    pub(crate) fn inject(&self, target: &mut T, value: &Instance) -> DiResult<()> {
        (self.assign)(target, value)
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("type", &self.key)
            .finish()
    }
}
