//! Relationship planner - turns relationship chains into correlated SQL.
//!
//! Two phases:
//! 1. Path resolution: `"a.b.c"` → [`RelationshipPath`] (names checked against the catalog)
//! 2. Aggregate planning: [`RelationshipPath`] → [`AggregatePlan`] (aliases minted, joins laid out)
//!
//! The plan is then finished either as a correlated scalar subquery
//! ([`AggregatePlan::correlated`]) or as a row-producing query anchored on the
//! root table ([`AggregatePlan::anchored`]).

pub mod aggregate;
pub mod path;
pub mod scope;

pub use aggregate::AggregatePlan;
pub use path::{resolve, RelationshipPath};
pub use scope::AliasArena;
