//! Declarative schema files.
//!
//! A schema file is TOML:
//!
//! ```toml
//! [aliases]
//! articles = "Article"
//! categories = "Category"
//!
//! [[entity]]
//! name = "Article"
//! table = "article"
//! primary_key = "id"
//! columns = ["id", "name", "content", "category_id"]
//! foreign_keys = { category_id = "category.id" }
//!
//! [[entity.relationship]]
//! name = "category"
//! target = "Category"
//! cardinality = "to_one"
//! join = [["category_id", "id"]]
//!
//! [[entity.relationship]]
//! name = "tags"
//! target = "Tag"
//! cardinality = "to_many"
//! secondary = "article_tag"
//! join = [["id", "article_id"]]
//! secondary_join = [["tag_id", "id"]]
//!
//! [[junction]]
//! table = "article_tag"
//! columns = ["article_id", "tag_id"]
//! ```
//!
//! Without an `[aliases]` table every entity is aliased by its pluralized
//! table name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::builder::{CatalogBuilder, CatalogError};
use super::{Cardinality, Catalog, Column, ForeignKey, JoinSpec};
use crate::alias::{AliasError, AliasRegistry};

/// Errors that can occur when loading a schema file.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Schema file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse schema file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid foreign key '{reference}' on {entity}.{column}: expected table.column")]
    InvalidReference {
        entity: String,
        column: String,
        reference: String,
    },

    #[error("Foreign key on undeclared column '{column}' of entity {entity}")]
    UndeclaredColumn { entity: String, column: String },

    #[error("Invalid schema: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid aliases: {0}")]
    Alias(#[from] AliasError),
}

pub type LoaderResult<T> = Result<T, LoaderError>;

/// Root of a schema file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntitySpec>,

    #[serde(default, rename = "junction")]
    pub junctions: Vec<JunctionSpec>,

    /// Alias to entity name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// One `[[entity]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySpec {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    pub primary_key: String,
    /// Every column in declaration order. The primary key is prepended when missing.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Column name to `table.column`.
    #[serde(default)]
    pub foreign_keys: BTreeMap<String, String>,
    #[serde(default, rename = "relationship")]
    pub relationships: Vec<RelationshipSpec>,
}

/// One `[[entity.relationship]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipSpec {
    pub name: String,
    pub target: String,
    pub cardinality: Cardinality,
    /// `(source, target)` pairs, or `(source, secondary)` pairs with `secondary`.
    pub join: Vec<(String, String)>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub secondary_schema: Option<String>,
    /// `(secondary, target)` pairs.
    #[serde(default)]
    pub secondary_join: Vec<(String, String)>,
}

/// One `[[junction]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JunctionSpec {
    pub table: String,
    pub columns: Vec<String>,
}

impl SchemaFile {
    pub fn from_toml_str(content: &str) -> LoaderResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> LoaderResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Build the catalog and the alias registry described by this file.
    pub fn into_parts(self) -> LoaderResult<(Catalog, AliasRegistry)> {
        let mut builder = CatalogBuilder::new();

        for junction in &self.junctions {
            let columns: Vec<&str> = junction.columns.iter().map(String::as_str).collect();
            builder.junction(&junction.table, &columns);
        }

        for spec in self.entities {
            for column in spec.foreign_keys.keys() {
                if !spec.columns.contains(column) {
                    return Err(LoaderError::UndeclaredColumn {
                        entity: spec.name.clone(),
                        column: column.clone(),
                    });
                }
            }

            let entity = builder.entity(&spec.name, &spec.table);
            if let Some(schema) = &spec.schema {
                entity.schema(schema);
            }

            if !spec.columns.contains(&spec.primary_key) {
                entity.primary_key(&spec.primary_key);
            }
            for name in &spec.columns {
                let foreign_key = match spec.foreign_keys.get(name) {
                    Some(reference) => Some(parse_reference(&spec.name, name, reference)?),
                    None => None,
                };
                entity.push_column(Column {
                    name: name.clone(),
                    primary_key: *name == spec.primary_key,
                    foreign_key,
                });
            }

            for relationship in spec.relationships {
                let join = match relationship.secondary {
                    Some(table) => JoinSpec::Secondary {
                        table,
                        schema: relationship.secondary_schema,
                        source_pairs: relationship.join,
                        target_pairs: relationship.secondary_join,
                    },
                    None => JoinSpec::Direct(relationship.join),
                };
                entity.relationship(
                    &relationship.name,
                    &relationship.target,
                    relationship.cardinality,
                    join,
                );
            }
        }

        let catalog = builder.build()?;
        let registry = if self.aliases.is_empty() {
            AliasRegistry::pluralized(&catalog)?
        } else {
            AliasRegistry::new(&catalog, &self.aliases)?
        };
        Ok((catalog, registry))
    }
}

fn parse_reference(entity: &str, column: &str, reference: &str) -> LoaderResult<ForeignKey> {
    match reference.split_once('.') {
        Some((table, target)) if !table.is_empty() && !target.is_empty() => Ok(ForeignKey {
            table: table.into(),
            column: target.into(),
        }),
        _ => Err(LoaderError::InvalidReference {
            entity: entity.into(),
            column: column.into(),
            reference: reference.into(),
        }),
    }
}
