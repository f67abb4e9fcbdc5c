//! Resource object expressions.
//!
//! A resource object is `{id, type, attributes?, relationships?}`. The
//! `attributes` and `relationships` members are only emitted for types whose
//! alias is present in the field selection, and only when non-empty.

use crate::alias::AliasRegistry;
use crate::error::Result;
use crate::planner::{AggregatePlan, AliasArena, RelationshipPath};
use crate::schema::{Catalog, EntityType};
use crate::sql::expr::{json_embed, json_object, lit_str, table_col, Expr};

use super::fields::{resolve_fields, FieldSelection, SelectedField};

/// JSON key/value pairs, in emission order.
pub type JsonPairs = Vec<(String, Expr)>;

/// Builds resource object expressions for one compile.
#[derive(Debug, Clone, Copy)]
pub struct ResourceBuilder<'a> {
    catalog: &'a Catalog,
    registry: &'a AliasRegistry,
    fields: Option<&'a FieldSelection>,
    strict_fields: bool,
}

impl<'a> ResourceBuilder<'a> {
    pub fn new(
        catalog: &'a Catalog,
        registry: &'a AliasRegistry,
        fields: Option<&'a FieldSelection>,
        strict_fields: bool,
    ) -> Self {
        Self {
            catalog,
            registry,
            fields,
            strict_fields,
        }
    }

    /// The selection list for `entity`, `None` when its alias is not selected.
    fn selection_for(&self, entity: &EntityType) -> Result<Option<&'a [String]>> {
        let alias = self.registry.alias_of(entity.id())?;
        Ok(self.fields.and_then(|fields| fields.get(alias)))
    }

    /// `id` from the primary key and `type` from the registered alias.
    pub fn id_and_type(&self, entity: &EntityType, sql_alias: &str) -> Result<JsonPairs> {
        let type_name = self.registry.alias_of(entity.id())?;
        Ok(vec![
            ("id".into(), table_col(sql_alias, entity.primary_key())),
            ("type".into(), lit_str(type_name)),
        ])
    }

    /// Attribute columns of `entity`, in declaration order.
    ///
    /// Every attribute is emitted when there is no selection or the alias is
    /// not part of it; otherwise only the listed ones.
    pub fn attributes(&self, entity: &EntityType, sql_alias: &str) -> Result<JsonPairs> {
        let selected = match self.selection_for(entity)? {
            Some(names) => Some(resolve_fields(entity, names, self.strict_fields)?),
            None => None,
        };
        Ok(attribute_pairs(entity, sql_alias, selected.as_deref()))
    }

    /// `{"data": ...}` for each selected relationship, in selection order.
    pub fn relationships(
        &self,
        arena: &mut AliasArena,
        entity: &EntityType,
        sql_alias: &str,
    ) -> Result<JsonPairs> {
        match self.selection_for(entity)? {
            Some(names) => {
                let selected = resolve_fields(entity, names, self.strict_fields)?;
                self.relationship_pairs(arena, sql_alias, &selected)
            }
            None => Ok(Vec::new()),
        }
    }

    fn relationship_pairs(
        &self,
        arena: &mut AliasArena,
        sql_alias: &str,
        selected: &[SelectedField<'_>],
    ) -> Result<JsonPairs> {
        let mut pairs = Vec::new();
        for field in selected {
            let SelectedField::Relationship(relationship) = field else {
                continue;
            };

            let plan = AggregatePlan::new(
                arena,
                self.catalog,
                sql_alias,
                &RelationshipPath::single(relationship),
            );
            let target = self.catalog.entity(relationship.target);
            let identifier = json_object(self.id_and_type(target, plan.target_alias())?);
            let data = json_embed(plan.correlated(identifier));

            pairs.push((relationship.name.clone(), json_object([("data", data)])));
        }
        Ok(pairs)
    }

    /// The full resource object for rows of `entity` bound to `sql_alias`.
    pub fn resource_object(
        &self,
        arena: &mut AliasArena,
        entity: &EntityType,
        sql_alias: &str,
    ) -> Result<Expr> {
        let mut pairs = self.id_and_type(entity, sql_alias)?;

        if let Some(names) = self.selection_for(entity)? {
            let selected = resolve_fields(entity, names, self.strict_fields)?;

            let attributes = attribute_pairs(entity, sql_alias, Some(&selected));
            if !attributes.is_empty() {
                pairs.push(("attributes".into(), json_object(attributes)));
            }

            let relationships = self.relationship_pairs(arena, sql_alias, &selected)?;
            if !relationships.is_empty() {
                pairs.push(("relationships".into(), json_object(relationships)));
            }
        }

        Ok(json_object(pairs))
    }
}

fn attribute_pairs(
    entity: &EntityType,
    sql_alias: &str,
    selected: Option<&[SelectedField<'_>]>,
) -> JsonPairs {
    entity
        .attributes()
        .filter(|column| match selected {
            None => true,
            Some(selected) => selected
                .iter()
                .any(|f| matches!(f, SelectedField::Column(c) if c.name == column.name)),
        })
        .map(|column| (column.name.clone(), table_col(sql_alias, &column.name)))
        .collect()
}
