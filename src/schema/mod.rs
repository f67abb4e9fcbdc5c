//! Schema catalog - entity types, columns and relationships.
//!
//! The catalog is an arena of [`EntityType`]s addressed by [`EntityId`].
//! It is assembled once through [`CatalogBuilder`] (or loaded from TOML via
//! [`loader::SchemaFile`]) and is read-only afterwards.
//!
//! ```text
//!   Article ──category (to-one)──▶ Category ──subcategories (to-many)──┐
//!      │                              ▲                                 │
//!      └──tags (to-many, article_tag) │                                 │
//!                                     └─────────────────────────────────┘
//! ```

pub mod builder;
pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sql::query::TableRef;

pub use builder::{CatalogBuilder, CatalogError, CatalogResult, EntityBuilder};
pub use loader::{LoaderError, SchemaFile};

// ============================================================================
// Identifiers
// ============================================================================

/// Index of an entity type inside its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Target of a foreign-key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// A column of an entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub primary_key: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            foreign_key: None,
        }
    }

    /// Primary and foreign keys are never exposed as attributes.
    pub fn is_attribute(&self) -> bool {
        !self.primary_key && self.foreign_key.is_none()
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// Whether a relationship yields one object (or null) or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// How a relationship's source rows are matched to its target rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinSpec {
    /// `(source column, target column)` pairs, ANDed.
    Direct(Vec<(String, String)>),

    /// Through a secondary (junction) table.
    Secondary {
        table: String,
        schema: Option<String>,
        /// `(source column, secondary column)` pairs.
        source_pairs: Vec<(String, String)>,
        /// `(secondary column, target column)` pairs.
        target_pairs: Vec<(String, String)>,
    },
}

/// A directed, named edge between two entity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    pub source: EntityId,
    pub target: EntityId,
    pub cardinality: Cardinality,
    pub join: JoinSpec,
}

impl Relationship {
    pub fn is_to_many(&self) -> bool {
        self.cardinality == Cardinality::ToMany
    }
}

// ============================================================================
// Entity Types
// ============================================================================

/// A schema-level record type backed by one table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    id: EntityId,
    name: String,
    table: String,
    schema: Option<String>,
    columns: Vec<Column>,
    primary_key: String,
    relationships: Vec<Relationship>,
    column_index: HashMap<String, usize>,
    relationship_index: HashMap<String, usize>,
}

impl EntityType {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Name of the (first) primary-key column.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index.get(name).map(|&i| &self.columns[i])
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationship_index
            .get(name)
            .map(|&i| &self.relationships[i])
    }

    /// Columns that are neither primary nor foreign keys, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_attribute())
    }

    /// This entity's table under the given SQL alias.
    pub fn table_ref(&self, alias: &str) -> TableRef {
        let table = TableRef::new(&self.table).with_alias(alias);
        match &self.schema {
            Some(schema) => table.with_schema(schema),
            None => table,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Arena of entity types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entities: Vec<EntityType>,
    by_name: HashMap<String, EntityId>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Look up an entity by id.
    ///
    /// Ids are only minted by the catalog that owns them; an id from another
    /// catalog is a programming error and panics.
    pub fn entity(&self, id: EntityId) -> &EntityType {
        &self.entities[id.0]
    }

    /// Look up an entity id by entity name.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
