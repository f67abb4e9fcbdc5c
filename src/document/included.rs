//! The `included` block.
//!
//! Every prefix of every include path contributes one member query that
//! yields the resource objects reachable from the (filtered) root rows. The
//! members are combined in one N-ary UNION, which also drops objects reached
//! along more than one path, then aggregated into a list.

use tracing::trace;

use crate::error::{BuildError, Result};
use crate::planner::{resolve, AggregatePlan, AliasArena};
use crate::schema::{Catalog, EntityType};
use crate::sql::expr::{json_array_agg, json_comparable, json_embed, table_col, Expr, ExprExt};
use crate::sql::query::{Query, SetOperation, TableRef};

use super::resource::ResourceBuilder;
use super::RootFilter;

/// Derived-table alias of the unioned members.
pub const INCLUDED_ALIAS: &str = "included";

/// Column each member query exposes.
pub const MEMBER_COLUMN: &str = "json_object";

/// One member query per prefix of every path, in path order.
pub fn build_members(
    arena: &mut AliasArena,
    catalog: &Catalog,
    builder: &ResourceBuilder<'_>,
    root: &EntityType,
    paths: &[&str],
    filter: Option<RootFilter<'_>>,
) -> Result<Vec<Query>> {
    let mut members = Vec::new();

    for path in paths {
        let path = resolve(catalog, root.id(), path)?;

        for prefix in path.prefixes() {
            let root_alias = arena.fresh(root.table());
            let plan = AggregatePlan::new(arena, catalog, &root_alias, &prefix);
            let target = catalog.entity(plan.target());
            let object = builder.resource_object(arena, target, plan.target_alias())?;

            trace!(
                path = %prefix.dotted(),
                target = target.name(),
                alias = plan.target_alias(),
                "planned included member"
            );

            members.push(plan.anchored(
                root.table_ref(&root_alias),
                filter.map(|f| f(&root_alias)),
                json_comparable(object).alias(MEMBER_COLUMN),
            ));
        }
    }

    Ok(members)
}

/// The `included` value: a list aggregate over the union of `members`.
pub fn aggregate_members(members: Vec<Query>) -> Result<Expr> {
    let union = SetOperation::union_of(members).ok_or(BuildError::EmptyIncludeSet)?;

    let aggregate = Query::new()
        .select(vec![json_array_agg(table_col(INCLUDED_ALIAS, MEMBER_COLUMN))])
        .from(TableRef::derived(Query::compound(union), INCLUDED_ALIAS));

    Ok(json_embed(aggregate))
}

/// Build the `included` value, `None` when there are no include paths.
pub fn build_included(
    arena: &mut AliasArena,
    catalog: &Catalog,
    builder: &ResourceBuilder<'_>,
    root: &EntityType,
    paths: &[&str],
    filter: Option<RootFilter<'_>>,
) -> Result<Option<Expr>> {
    if paths.is_empty() {
        return Ok(None);
    }

    let members = build_members(arena, catalog, builder, root, paths, filter)?;
    aggregate_members(members).map(Some)
}
