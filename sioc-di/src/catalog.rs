//! Known blueprints, indexed by key

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{DiError, DiResult};
use crate::injectable::{declarations, Recipe};
use crate::key::Key;

/// Blueprints the container can build from.
///
/// Seeded from the link-time declarations and extended by explicit
/// `declare` calls, which take precedence.
#[derive(Default)]
pub(crate) struct Catalog {
    recipes: FxHashMap<Key, Arc<dyn Recipe>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding every `injectable!` declaration
    pub fn with_declarations() -> Self {
        let mut catalog = Self::new();
        for declaration in declarations() {
            let key = declaration.key();
            if catalog.recipes.contains_key(&key) {
                warn!("Ignoring duplicate declaration of {}", key);
                continue;
            }
            catalog.recipes.insert(key, declaration.recipe());
        }
        debug!("Loaded {} injectable declarations", catalog.recipes.len());
        catalog
    }

    /// Add or replace the blueprint for `recipe.key()`
    pub fn insert(&mut self, recipe: Arc<dyn Recipe>) {
        let key = recipe.key();
        if self.recipes.insert(key, recipe).is_some() {
            debug!("Replaced blueprint for {}", key);
        }
    }

    pub fn get(&self, key: Key) -> Option<&Arc<dyn Recipe>> {
        self.recipes.get(&key)
    }

    pub fn contains(&self, key: Key) -> bool {
        self.recipes.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Find the key of a declared type by name.
    ///
    /// An exact `type_name` match wins; otherwise the short name must be
    /// unique among declared types.
    pub fn find_by_name(&self, name: &str) -> DiResult<Key> {
        if let Some(key) = self.recipes.keys().find(|key| key.type_name() == name) {
            return Ok(*key);
        }

        let mut matches = self.recipes.keys().filter(|key| key.short_name() == name);
        match (matches.next(), matches.next()) {
            (Some(key), None) => Ok(*key),
            (Some(first), Some(second)) => Err(DiError::ConfigError(format!(
                "service name {} is ambiguous: {} and {}",
                name, first, second
            ))),
            (None, _) => Err(DiError::UnknownServiceName {
                name: name.to_string(),
            }),
        }
    }
}
