//! Public type names for entity types.
//!
//! The registry is a bijection between entity types and the aliases that
//! appear in each resource object's `type` member. It is built once and never
//! mutated; there is no global default instance.

use std::collections::HashMap;

use inflector::Inflector;
use thiserror::Error;

use crate::error::{BuildError, Result};
use crate::schema::{Catalog, EntityId};

/// Errors that can occur while registering aliases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("Alias registered twice: {0}")]
    DuplicateAlias(String),

    #[error("Entity has more than one alias: {0}")]
    DuplicateEntity(String),

    #[error("Alias refers to unknown entity: {0}")]
    UnknownEntity(String),
}

/// Bidirectional alias lookup.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    by_alias: HashMap<String, EntityId>,
    by_entity: HashMap<EntityId, String>,
    /// Entity names by index, for error messages.
    entity_names: Vec<String>,
}

impl AliasRegistry {
    /// Register `(alias, entity name)` pairs.
    pub fn new<A, E>(
        catalog: &Catalog,
        aliases: impl IntoIterator<Item = (A, E)>,
    ) -> std::result::Result<Self, AliasError>
    where
        A: AsRef<str>,
        E: AsRef<str>,
    {
        let mut registry = Self {
            entity_names: catalog.entities().map(|e| e.name().to_string()).collect(),
            ..Default::default()
        };

        for (alias, entity) in aliases {
            let (alias, entity) = (alias.as_ref(), entity.as_ref());
            let id = catalog
                .lookup(entity)
                .ok_or_else(|| AliasError::UnknownEntity(entity.to_string()))?;
            registry.insert(alias, id, entity)?;
        }

        Ok(registry)
    }

    /// Alias every entity by its pluralized table name (`article` -> `articles`).
    pub fn pluralized(catalog: &Catalog) -> std::result::Result<Self, AliasError> {
        let pairs: Vec<(String, String)> = catalog
            .entities()
            .map(|e| (e.table().to_plural(), e.name().to_string()))
            .collect();
        Self::new(catalog, pairs)
    }

    fn insert(
        &mut self,
        alias: &str,
        id: EntityId,
        entity: &str,
    ) -> std::result::Result<(), AliasError> {
        if self.by_alias.contains_key(alias) {
            return Err(AliasError::DuplicateAlias(alias.to_string()));
        }
        if self.by_entity.contains_key(&id) {
            return Err(AliasError::DuplicateEntity(entity.to_string()));
        }
        self.by_alias.insert(alias.to_string(), id);
        self.by_entity.insert(id, alias.to_string());
        Ok(())
    }

    /// The alias of an entity type.
    pub fn alias_of(&self, id: EntityId) -> Result<&str> {
        self.by_entity.get(&id).map(String::as_str).ok_or_else(|| {
            BuildError::UnknownAlias(
                self.entity_names
                    .get(id.index())
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", id.index())),
            )
        })
    }

    /// The entity type registered under an alias.
    pub fn entity_of(&self, alias: &str) -> Result<EntityId> {
        self.by_alias
            .get(alias)
            .copied()
            .ok_or_else(|| BuildError::UnknownAlias(alias.to_string()))
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.by_alias.iter().map(|(alias, id)| (alias.as_str(), *id))
    }
}
