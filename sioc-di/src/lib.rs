//! Dependency injection container for sioc
//!
//! `sioc-di` builds fully wired service instances from explicit construction
//! metadata instead of runtime reflection:
//! - Every type lists its constructors and tagged properties ([`Injectable`])
//! - The container picks a constructor, resolving each parameter recursively
//! - Singletons are built once at registration and shared afterwards
//! - Transient services are built fresh for every request
//!
//! ```
//! use std::sync::Arc;
//! use sioc_di::prelude::*;
//!
//! struct Database;
//! struct Users { db: Arc<Database> }
//!
//! impl Injectable for Database {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::nullary(|| Database)]
//!     }
//! }
//!
//! impl Injectable for Users {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|(db,): (Arc<Database>,)| Users { db })]
//!     }
//! }
//!
//! sioc_di::injectable!(Database, Users);
//!
//! fn main() -> DiResult<()> {
//!     let mut container = Container::new();
//!     container.register_type::<Database>(true)?;
//!
//!     let users = container.resolve::<Users>()?;
//!     assert!(Arc::ptr_eq(&users.db, &container.resolve::<Database>()?));
//!     Ok(())
//! }
//! ```

pub mod builder;
mod catalog;
pub mod config;
pub mod constructor;
pub mod container;
pub mod error;
pub mod injectable;
pub mod instance;
pub mod key;
pub mod property;
pub mod registry;
pub mod selector;

pub use builder::{ContainerBuilder, Module};
pub use config::{ConfigBuilder, ContainerConfig, Lifetime, ServiceConfig};
pub use constructor::{Arguments, Constructor, Dependencies, Signature};
pub use container::Container;
pub use error::{DiError, DiResult};
pub use injectable::{declarations, Blueprint, Declaration, Injectable};
pub use instance::{Abstraction, Instance};
pub use key::Key;
pub use property::Property;

#[doc(hidden)]
pub use inventory;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Blueprint, Constructor, Container, ContainerBuilder, DiError, DiResult, Injectable,
        Lifetime, Module, Property,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_basic_container() {
        let mut builder = ContainerBuilder::new();
        builder.value("Hello, DI!".to_string());

        let container = builder.build().unwrap();
        let greeting = container.resolve::<String>().unwrap();
        assert_eq!(greeting.as_str(), "Hello, DI!");
        assert!(Arc::ptr_eq(&greeting, &container.lookup::<String>().unwrap()));
    }
}
