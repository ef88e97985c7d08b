//! Type identities used as registry keys

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a requested abstraction or concrete type.
///
/// Equality and hashing only look at the [`TypeId`]; the type name is kept
/// for diagnostics and for matching configured service names.
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for `T`, which may be unsized (`dyn Trait`, `str`, ...)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type id
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, without generics or `dyn`
    pub fn short_name(&self) -> &'static str {
        let base = self.name.trim_start_matches("dyn ");
        let base = base.split(['<', ' ']).next().unwrap_or(base);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Whether `name` refers to this key, either fully qualified or by short name
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.short_name() == name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
