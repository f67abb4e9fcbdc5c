//! Dotted relationship path resolution.

use crate::error::{BuildError, Result};
use crate::schema::{Catalog, EntityId, Relationship};

/// A non-empty chain of relationships, ordered from the scoped entity outward.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPath<'c> {
    hops: Vec<&'c Relationship>,
}

impl<'c> RelationshipPath<'c> {
    /// A one-hop path.
    pub fn single(relationship: &'c Relationship) -> Self {
        Self {
            hops: vec![relationship],
        }
    }

    pub fn hops(&self) -> &[&'c Relationship] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Never true for a resolved path.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// The entity the first hop starts from.
    pub fn source(&self) -> EntityId {
        self.hops[0].source
    }

    /// The entity the last hop arrives at.
    pub fn target(&self) -> EntityId {
        self.hops[self.hops.len() - 1].target
    }

    /// True when any hop is to-many, i.e. the path can reach several rows.
    pub fn is_to_many(&self) -> bool {
        self.hops.iter().any(|hop| hop.is_to_many())
    }

    /// Every prefix, shortest first. The last one is the path itself.
    pub fn prefixes(&self) -> impl Iterator<Item = RelationshipPath<'c>> + '_ {
        (1..=self.hops.len()).map(|len| RelationshipPath {
            hops: self.hops[..len].to_vec(),
        })
    }

    /// Dotted form, e.g. `category.subcategories`.
    pub fn dotted(&self) -> String {
        self.hops
            .iter()
            .map(|hop| hop.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Resolve a dotted include path starting at `root`.
///
/// Each segment is looked up on the current entity, then the cursor advances
/// to the relationship's target. Cycles need no special handling.
pub fn resolve<'c>(catalog: &'c Catalog, root: EntityId, path: &str) -> Result<RelationshipPath<'c>> {
    let mut cursor = catalog.entity(root);
    let mut hops = Vec::new();

    for segment in path.split('.') {
        let relationship =
            cursor
                .relationship(segment)
                .ok_or_else(|| BuildError::UnknownRelationship {
                    segment: segment.to_string(),
                    entity: cursor.name().to_string(),
                })?;
        hops.push(relationship);
        cursor = catalog.entity(relationship.target);
    }

    Ok(RelationshipPath { hops })
}
