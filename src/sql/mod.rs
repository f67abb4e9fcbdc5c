//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates multi-dialect SQL.
//! It includes:
//!
//! - [`query`] - SELECT query builder and UNION
//! - [`expr`] - Expression AST, including the JSON constructors
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    and_all, coalesce, col, func, json_array_agg, json_comparable, json_embed, json_object,
    lit_bool, lit_float, lit_int, lit_null, lit_str, star, table_col, table_star, BinaryOperator,
    Expr, ExprExt, Literal, UnaryOperator,
};
pub use query::{Join, Query, SelectExpr, SetOperation, TableRef, TableSource};
pub use token::{Token, TokenStream};
