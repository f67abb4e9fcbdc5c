//! Sparse field selection.
//!
//! A [`FieldSelection`] maps a type alias to the field names to emit for
//! resources of that type. Field names may be columns or relationships.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::alias::AliasRegistry;
use crate::error::{BuildError, Result};
use crate::schema::{Column, EntityType, Relationship};

/// Alias to ordered field names.
///
/// ```rust
/// use jsonapi_sql::document::FieldSelection;
///
/// let fields = FieldSelection::new()
///     .with("articles", ["name", "content", "category"])
///     .with("categories", ["name"]);
/// assert_eq!(fields.get("articles").unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSelection {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FieldSelection::insert`].
    pub fn with<I, S>(mut self, alias: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(alias, fields);
        self
    }

    /// Select `fields` for `alias`, replacing any earlier list.
    pub fn insert<I, S>(&mut self, alias: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(alias.to_string(), fields.into_iter().map(Into::into).collect());
    }

    /// Parse a comma-separated list, as in `fields[articles]=name,content`.
    pub fn insert_csv(&mut self, alias: &str, fields: &str) {
        self.insert(
            alias,
            fields.split(',').map(str::trim).filter(|f| !f.is_empty()),
        );
    }

    pub fn get(&self, alias: &str) -> Option<&[String]> {
        self.fields.get(alias).map(Vec::as_slice)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.fields.contains_key(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every alias must be registered.
    pub fn validate(&self, registry: &AliasRegistry) -> Result<()> {
        for alias in self.aliases() {
            registry.entity_of(alias)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for FieldSelection {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A selected field name resolved against an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedField<'e> {
    Column(&'e Column),
    Relationship(&'e Relationship),
}

/// Resolve selected names against `entity`, in selection order.
///
/// A name that is neither a column nor a relationship fails when `strict`,
/// otherwise it is skipped.
pub fn resolve_fields<'e>(
    entity: &'e EntityType,
    names: &[String],
    strict: bool,
) -> Result<Vec<SelectedField<'e>>> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        if let Some(column) = entity.column(name) {
            resolved.push(SelectedField::Column(column));
        } else if let Some(relationship) = entity.relationship(name) {
            resolved.push(SelectedField::Relationship(relationship));
        } else if strict {
            return Err(BuildError::UnknownField {
                entity: entity.name().to_string(),
                field: name.clone(),
            });
        } else {
            warn!(entity = entity.name(), field = %name, "skipping unknown field");
        }
    }
    Ok(resolved)
}
