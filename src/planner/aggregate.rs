//! Aggregate join planning.
//!
//! Given a relationship path scoped to an outer row, lays out the joins that
//! reach the path's terminal entity:
//!
//! ```text
//! path:   outer ──hop 1──▶ e1 ──hop 2──▶ e2 ──hop 3──▶ target
//!
//! SQL:    FROM target AS target_n
//!         INNER JOIN e2 AS e2_n ON <hop 3>
//!         INNER JOIN e1 AS e1_n ON <hop 2>
//!         WHERE <hop 1 against outer_alias>          -- correlated
//!    or   INNER JOIN outer AS outer_alias ON <hop 1> -- anchored
//! ```
//!
//! A hop through a secondary table joins the secondary first, so the hop's
//! condition splits in two.

use crate::schema::{Catalog, EntityId, JoinSpec, Relationship};
use crate::sql::expr::{and_all, json_array_agg, lit_bool, table_col, Expr, ExprExt};
use crate::sql::query::{Query, SelectExpr, TableRef};

use super::path::RelationshipPath;
use super::scope::AliasArena;

/// Joins and correlation for one relationship path.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    from: TableRef,
    joins: Vec<(TableRef, Expr)>,
    correlation: Expr,
    target: EntityId,
    target_alias: String,
    to_many: bool,
}

impl AggregatePlan {
    /// Plan `path`, whose source entity is bound to `outer_alias`.
    pub fn new(
        arena: &mut AliasArena,
        catalog: &Catalog,
        outer_alias: &str,
        path: &RelationshipPath<'_>,
    ) -> Self {
        let target = catalog.entity(path.target());
        let target_alias = arena.fresh(target.table());
        let from = target.table_ref(&target_alias);

        let mut joins = Vec::new();
        let hops = path.hops();

        // Walk back from the target; hop 0 is left for the correlation.
        let mut far_alias = target_alias.clone();
        for hop in hops[1..].iter().rev() {
            let near = catalog.entity(hop.source);
            let near_alias = arena.fresh(near.table());
            let condition = hop_condition(arena, hop, &near_alias, &far_alias, &mut joins);
            joins.push((near.table_ref(&near_alias), condition));
            far_alias = near_alias;
        }
        let correlation = hop_condition(arena, hops[0], outer_alias, &far_alias, &mut joins);

        Self {
            from,
            joins,
            correlation,
            target: path.target(),
            target_alias,
            to_many: path.is_to_many(),
        }
    }

    /// The terminal entity.
    pub fn target(&self) -> EntityId {
        self.target
    }

    /// The SQL alias the terminal entity is bound to.
    pub fn target_alias(&self) -> &str {
        &self.target_alias
    }

    pub fn is_to_many(&self) -> bool {
        self.to_many
    }

    /// The condition tying the plan to the outer row.
    pub fn correlation(&self) -> &Expr {
        &self.correlation
    }

    fn base(&self) -> Query {
        self.joins.iter().fold(
            Query::new().from(self.from.clone()),
            |query, (table, on)| query.inner_join(table.clone(), on.clone()),
        )
    }

    /// A scalar subquery producing `expr` for the outer row.
    ///
    /// To-many paths aggregate into a JSON array (`[]` when empty). To-one
    /// paths return at most one value, NULL when there is no match.
    pub fn correlated(self, expr: Expr) -> Query {
        let query = self.base();
        if self.to_many {
            query
                .select(vec![json_array_agg(expr)])
                .filter(self.correlation)
        } else {
            query.select(vec![expr]).filter(self.correlation).limit(1)
        }
    }

    /// A row-producing query: one row per target reachable from the rows of
    /// `root` (bound to the plan's outer alias) that pass `filter`.
    pub fn anchored(self, root: TableRef, filter: Option<Expr>, select: SelectExpr) -> Query {
        let query = self
            .base()
            .select(vec![select])
            .inner_join(root, self.correlation);
        match filter {
            Some(filter) => query.filter(filter),
            None => query,
        }
    }
}

/// Condition linking `near_alias` (the hop's source) to `far_alias` (its
/// target). A secondary table is joined onto `joins` and the returned
/// condition links the source to it instead.
fn hop_condition(
    arena: &mut AliasArena,
    hop: &Relationship,
    near_alias: &str,
    far_alias: &str,
    joins: &mut Vec<(TableRef, Expr)>,
) -> Expr {
    match &hop.join {
        JoinSpec::Direct(pairs) => join_on(pairs, near_alias, far_alias),
        JoinSpec::Secondary {
            table,
            schema,
            source_pairs,
            target_pairs,
        } => {
            let secondary_alias = arena.fresh(table);
            let mut secondary = TableRef::new(table).with_alias(&secondary_alias);
            if let Some(schema) = schema {
                secondary = secondary.with_schema(schema);
            }
            joins.push((secondary, join_on(target_pairs, &secondary_alias, far_alias)));
            join_on(source_pairs, near_alias, &secondary_alias)
        }
    }
}

/// `left.a = right.b AND ...`. Pair lists are non-empty in a built catalog.
fn join_on(pairs: &[(String, String)], left: &str, right: &str) -> Expr {
    and_all(
        pairs
            .iter()
            .map(|(l, r)| table_col(left, l).eq(table_col(right, r))),
    )
    .unwrap_or_else(|| lit_bool(false))
}
