//! Constructor descriptors
//!
//! Without runtime reflection, every construction path of a type is declared
//! up front: the ordered parameter keys, whether it is the forced
//! "dependency constructor", and a typed closure that builds the value from
//! the resolved arguments.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::key::Key;

/// The shape of a constructor: parameter keys in declaration order, plus the
/// dependency-constructor marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Key>,
    dependency: bool,
}

impl Signature {
    /// Create a signature from its parameter keys
    pub fn new(params: Vec<Key>) -> Self {
        Self {
            params,
            dependency: false,
        }
    }

    /// Mark this signature as the dependency constructor
    pub fn into_dependency(mut self) -> Self {
        self.dependency = true;
        self
    }

    /// Parameter keys in declaration order
    pub fn params(&self) -> &[Key] {
        &self.params
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether this is the forced-choice constructor
    pub fn is_dependency(&self) -> bool {
        self.dependency
    }
}

/// Resolved constructor arguments, consumed front to back.
pub struct Arguments {
    values: std::vec::IntoIter<Instance>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Take the next argument as `Arc<T>`
    pub fn next<T: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        match self.values.next() {
            Some(value) => value.downcast::<T>(),
            None => Err(DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                found: "<missing argument>",
            }),
        }
    }
}

/// A parameter list that can be declared statically and rebuilt from
/// resolved arguments.
///
/// Implemented for `()` and for tuples of `Arc<_>` up to eight elements.
pub trait Dependencies: Sized {
    /// Keys of each parameter, in order
    fn keys() -> Vec<Key>;

    /// Rebuild the typed parameter list
    fn from_arguments(args: &mut Arguments) -> DiResult<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<Key> {
        Vec::new()
    }

    fn from_arguments(_args: &mut Arguments) -> DiResult<Self> {
        Ok(())
    }
}

macro_rules! tuple_dependencies {
    ($($name:ident),+) => {
        impl<$($name: ?Sized + Send + Sync + 'static),+> Dependencies for ($(Arc<$name>,)+) {
            fn keys() -> Vec<Key> {
                vec![$(Key::of::<$name>()),+]
            }

            fn from_arguments(args: &mut Arguments) -> DiResult<Self> {
                Ok(($(args.next::<$name>()?,)+))
            }
        }
    };
}

tuple_dependencies!(A);
tuple_dependencies!(A, B);
tuple_dependencies!(A, B, C);
tuple_dependencies!(A, B, C, D);
tuple_dependencies!(A, B, C, D, E);
tuple_dependencies!(A, B, C, D, E, F);
tuple_dependencies!(A, B, C, D, E, F, G);
tuple_dependencies!(A, B, C, D, E, F, G, H);

type BuildFn<T> = Box<dyn Fn(&mut Arguments) -> DiResult<T> + Send + Sync>;

/// One construction path for `T`
pub struct Constructor<T> {
    signature: Signature,
    build: BuildFn<T>,
}

impl<T: 'static> Constructor<T> {
    /// Declare a constructor whose parameters are given by the closure's
    /// argument tuple.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sioc_di::Constructor;
    ///
    /// struct Engine;
    /// struct Car { engine: Arc<Engine> }
    ///
    /// let ctor = Constructor::new(|(engine,): (Arc<Engine>,)| Car { engine });
    /// assert_eq!(ctor.signature().arity(), 1);
    /// ```
    pub fn new<D, F>(build: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> T + Send + Sync + 'static,
    {
        Self {
            signature: Signature::new(D::keys()),
            build: Box::new(move |args: &mut Arguments| D::from_arguments(args).map(&build)),
        }
    }

    /// Declare a constructor that may fail with a domain error
    pub fn try_new<D, F, E>(build: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> Result<T, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            signature: Signature::new(D::keys()),
            build: Box::new(move |args: &mut Arguments| {
                let deps = D::from_arguments(args)?;
                build(deps).map_err(|e| DiError::Construction {
                    service: std::any::type_name::<T>(),
                    reason: e.to_string(),
                })
            }),
        }
    }

    /// Declare a parameterless constructor
    pub fn nullary<F>(build: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(move |(): ()| build())
    }

    /// Mark this constructor as the one to use unconditionally
    pub fn dependency(mut self) -> Self {
        self.signature = self.signature.into_dependency();
        self
    }

    /// The declared shape of this constructor
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Build a value from resolved arguments, which must match the signature
    pub(crate) fn build(&self, args: Vec<Instance>) -> DiResult<T> {
        if args.len() != self.signature.arity() {
            return Err(DiError::ArgumentCount {
                service: std::any::type_name::<T>(),
                expected: self.signature.arity(),
                found: args.len(),
            });
        }
        let mut args = Arguments::new(args);
        (self.build)(&mut args)
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("service", &std::any::type_name::<T>())
            .field("signature", &self.signature)
            .finish()
    }
}
