//! Catalog construction and validation.
//!
//! Entities are declared by name and their relationships refer to targets by
//! name. [`CatalogBuilder::build`] resolves the names to [`EntityId`]s and
//! checks every join column, so a built [`Catalog`] never needs re-validation.

use std::collections::{HashMap, HashSet};

use super::{Cardinality, Catalog, Column, EntityId, EntityType, ForeignKey, JoinSpec, Relationship};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during catalog construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate entity name: {0}")]
    DuplicateEntity(String),

    #[error("Duplicate column '{column}' on entity {entity}")]
    DuplicateColumn { entity: String, column: String },

    #[error("Duplicate field '{field}' on entity {entity}")]
    DuplicateField { entity: String, field: String },

    #[error("Entity {0} has no primary key")]
    MissingPrimaryKey(String),

    #[error("Relationship '{relationship}' on {entity} targets unknown entity {target}")]
    UnknownTarget {
        entity: String,
        relationship: String,
        target: String,
    },

    #[error("Relationship '{relationship}' on {entity} has no join columns")]
    EmptyJoin { entity: String, relationship: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' on table {table}")]
    UnknownColumn { table: String, column: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

// ============================================================================
// Builders
// ============================================================================

fn owned_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(l, r)| (l.to_string(), r.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
struct PendingRelationship {
    name: String,
    target: String,
    cardinality: Cardinality,
    join: JoinSpec,
}

/// Declares one entity type. Obtained from [`CatalogBuilder::entity`].
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: String,
    table: String,
    schema: Option<String>,
    columns: Vec<Column>,
    relationships: Vec<PendingRelationship>,
}

impl EntityBuilder {
    fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            schema: None,
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn schema(&mut self, schema: &str) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    /// A plain column, exposed as an attribute.
    pub fn column(&mut self, name: &str) -> &mut Self {
        self.columns.push(Column::new(name));
        self
    }

    /// A primary-key column. The first one declared is the resource id.
    pub fn primary_key(&mut self, name: &str) -> &mut Self {
        self.columns.push(Column {
            primary_key: true,
            ..Column::new(name)
        });
        self
    }

    /// A foreign-key column referencing `table.column`.
    pub fn foreign_key(&mut self, name: &str, table: &str, column: &str) -> &mut Self {
        self.columns.push(Column {
            foreign_key: Some(ForeignKey {
                table: table.into(),
                column: column.into(),
            }),
            ..Column::new(name)
        });
        self
    }

    /// Push a fully-specified column.
    pub fn push_column(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// A relationship yielding one object or null.
    pub fn to_one<'a>(
        &mut self,
        name: &str,
        target: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.relationship(
            name,
            target,
            Cardinality::ToOne,
            JoinSpec::Direct(owned_pairs(pairs)),
        )
    }

    /// A relationship yielding a list.
    pub fn to_many<'a>(
        &mut self,
        name: &str,
        target: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.relationship(
            name,
            target,
            Cardinality::ToMany,
            JoinSpec::Direct(owned_pairs(pairs)),
        )
    }

    /// A to-many relationship through a secondary table.
    pub fn many_to_many<'a>(
        &mut self,
        name: &str,
        target: &str,
        secondary: &str,
        source_pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        target_pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        self.relationship(
            name,
            target,
            Cardinality::ToMany,
            JoinSpec::Secondary {
                table: secondary.into(),
                schema: None,
                source_pairs: owned_pairs(source_pairs),
                target_pairs: owned_pairs(target_pairs),
            },
        )
    }

    /// A relationship with an explicit cardinality and join.
    pub fn relationship(
        &mut self,
        name: &str,
        target: &str,
        cardinality: Cardinality,
        join: JoinSpec,
    ) -> &mut Self {
        self.relationships.push(PendingRelationship {
            name: name.into(),
            target: target.into(),
            cardinality,
            join,
        });
        self
    }
}

/// Builds a validated [`Catalog`].
///
/// ```rust
/// use jsonapi_sql::schema::CatalogBuilder;
///
/// let mut builder = CatalogBuilder::new();
/// builder
///     .entity("Category", "category")
///     .primary_key("id")
///     .column("name")
///     .foreign_key("parent_id", "category", "id")
///     .to_many("subcategories", "Category", [("id", "parent_id")]);
/// let catalog = builder.build().unwrap();
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    entities: Vec<EntityBuilder>,
    junctions: Vec<(String, Vec<String>)>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity type backed by `table`.
    pub fn entity(&mut self, name: &str, table: &str) -> &mut EntityBuilder {
        let index = self.entities.len();
        self.entities.push(EntityBuilder::new(name, table));
        &mut self.entities[index]
    }

    /// Declare a secondary table that is not an entity itself.
    pub fn junction(&mut self, table: &str, columns: &[&str]) -> &mut Self {
        self.junctions.push((
            table.into(),
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    /// Resolve relationship targets and validate every entity.
    pub fn build(self) -> CatalogResult<Catalog> {
        let mut by_name = HashMap::new();
        for (index, entity) in self.entities.iter().enumerate() {
            if by_name
                .insert(entity.name.clone(), EntityId(index))
                .is_some()
            {
                return Err(CatalogError::DuplicateEntity(entity.name.clone()));
            }
        }

        // Columns of every table a join may reference.
        let mut tables: HashMap<&str, HashSet<&str>> = HashMap::new();
        for entity in &self.entities {
            tables
                .entry(entity.table.as_str())
                .or_default()
                .extend(entity.columns.iter().map(|c| c.name.as_str()));
        }
        for (table, columns) in &self.junctions {
            tables
                .entry(table.as_str())
                .or_default()
                .extend(columns.iter().map(|c| c.as_str()));
        }

        let mut entities = Vec::with_capacity(self.entities.len());
        for (index, entity) in self.entities.iter().enumerate() {
            let id = EntityId(index);

            let mut column_index = HashMap::new();
            for (i, column) in entity.columns.iter().enumerate() {
                if column_index.insert(column.name.clone(), i).is_some() {
                    return Err(CatalogError::DuplicateColumn {
                        entity: entity.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }

            let primary_key = entity
                .columns
                .iter()
                .find(|c| c.primary_key)
                .map(|c| c.name.clone())
                .ok_or_else(|| CatalogError::MissingPrimaryKey(entity.name.clone()))?;

            let mut relationships = Vec::with_capacity(entity.relationships.len());
            let mut relationship_index = HashMap::new();
            for pending in &entity.relationships {
                if column_index.contains_key(&pending.name)
                    || relationship_index.contains_key(&pending.name)
                {
                    return Err(CatalogError::DuplicateField {
                        entity: entity.name.clone(),
                        field: pending.name.clone(),
                    });
                }

                let target = by_name.get(&pending.target).copied().ok_or_else(|| {
                    CatalogError::UnknownTarget {
                        entity: entity.name.clone(),
                        relationship: pending.name.clone(),
                        target: pending.target.clone(),
                    }
                })?;
                let target_table = self.entities[target.0].table.as_str();

                validate_join(&tables, entity, pending, target_table)?;

                relationship_index.insert(pending.name.clone(), relationships.len());
                relationships.push(Relationship {
                    name: pending.name.clone(),
                    source: id,
                    target,
                    cardinality: pending.cardinality,
                    join: pending.join.clone(),
                });
            }

            entities.push(EntityType {
                id,
                name: entity.name.clone(),
                table: entity.table.clone(),
                schema: entity.schema.clone(),
                columns: entity.columns.clone(),
                primary_key,
                relationships,
                column_index,
                relationship_index,
            });
        }

        Ok(Catalog { entities, by_name })
    }
}

fn validate_join(
    tables: &HashMap<&str, HashSet<&str>>,
    entity: &EntityBuilder,
    relationship: &PendingRelationship,
    target_table: &str,
) -> CatalogResult<()> {
    let check = |table: &str, column: &str| -> CatalogResult<()> {
        let columns = tables
            .get(table)
            .ok_or_else(|| CatalogError::UnknownTable(table.to_string()))?;
        if columns.contains(column) {
            Ok(())
        } else {
            Err(CatalogError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
        }
    };
    let empty = || CatalogError::EmptyJoin {
        entity: entity.name.clone(),
        relationship: relationship.name.clone(),
    };

    match &relationship.join {
        JoinSpec::Direct(pairs) => {
            if pairs.is_empty() {
                return Err(empty());
            }
            for (source, target) in pairs {
                check(&entity.table, source)?;
                check(target_table, target)?;
            }
        }
        JoinSpec::Secondary {
            table,
            source_pairs,
            target_pairs,
            ..
        } => {
            if source_pairs.is_empty() || target_pairs.is_empty() {
                return Err(empty());
            }
            for (source, secondary) in source_pairs {
                check(&entity.table, source)?;
                check(table, secondary)?;
            }
            for (secondary, target) in target_pairs {
                check(table, secondary)?;
                check(target_table, target)?;
            }
        }
    }
    Ok(())
}
