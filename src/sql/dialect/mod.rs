//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (PG/SQLite/DuckDB), `` ` `` (MySQL)
//! - Boolean literals: true/false vs 1/0
//! - JSON object construction: `json_build_object` vs `json_object`
//! - JSON list aggregation and the empty-list fallback
//! - Whether a JSON value survives a subquery boundary
//! - Which JSON representation supports equality (needed by UNION)
//!
//! # Usage
//!
//! ```ignore
//! use jsonapi_sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```
//!
//! # JSON support
//!
//! | Feature | PostgreSQL | SQLite | MySQL | DuckDB |
//! |---------|-----------|--------|-------|--------|
//! | Object constructor | 9.4+ | 3.38+ (or JSON1) | 5.7.22+ | json extension |
//! | Array aggregate | 9.3+ | 3.38+ (or JSON1) | 5.7.22+ | json extension |
//! | Parenthesized UNION operands | ✓ | ❌ | ✓ | ✓ |

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use serde::{Deserialize, Serialize};

use super::token::TokenStream;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - PostgreSQL/SQLite/DuckDB: `"identifier"`
    /// - MySQL: `` `identifier` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    ///
    /// - PostgreSQL/DuckDB: `true`/`false`
    /// - MySQL/SQLite: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    // =========================================================================
    // Limit
    // =========================================================================

    /// Emit the LIMIT clause of a to-one subquery.
    fn emit_limit(&self, limit: u32) -> TokenStream {
        helpers::emit_limit_standard(limit)
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    /// Whether UNION operands may be wrapped in parentheses.
    ///
    /// SQLite rejects `(SELECT ...) UNION (SELECT ...)`.
    fn supports_parenthesized_set_operands(&self) -> bool {
        true
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Name of the variadic key/value JSON object constructor.
    fn json_object_function(&self) -> &'static str {
        "JSON_OBJECT"
    }

    /// Aggregate a JSON value over all rows into a JSON array.
    ///
    /// Must yield `[]` rather than NULL for zero rows.
    fn emit_json_array_agg(&self, inner: &TokenStream) -> TokenStream;

    /// Re-mark a JSON value read back from a subquery as JSON.
    ///
    /// Identity for dialects with a real JSON column type.
    fn emit_json_embed(&self, inner: &TokenStream) -> TokenStream {
        inner.clone()
    }

    /// Convert a JSON value to a representation with equality, for UNION.
    fn emit_json_comparable(&self, inner: &TokenStream) -> TokenStream {
        inner.clone()
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    #[serde(alias = "sqlite3")]
    Sqlite,
    MySql,
    #[serde(alias = "duck")]
    DuckDb,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn imp(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &Postgres,
            Dialect::Sqlite => &Sqlite,
            Dialect::MySql => &MySql,
            Dialect::DuckDb => &DuckDb,
        }
    }

    /// Parse a dialect from its display name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(Dialect::Postgres),
            "sqlite" | "sqlite3" => Some(Dialect::Sqlite),
            "mysql" => Some(Dialect::MySql),
            "duckdb" | "duck" => Some(Dialect::DuckDb),
            _ => None,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.imp().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.imp().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.imp().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.imp().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.imp().format_null()
    }

    fn emit_limit(&self, limit: u32) -> TokenStream {
        self.imp().emit_limit(limit)
    }

    fn supports_parenthesized_set_operands(&self) -> bool {
        self.imp().supports_parenthesized_set_operands()
    }

    fn json_object_function(&self) -> &'static str {
        self.imp().json_object_function()
    }

    fn emit_json_array_agg(&self, inner: &TokenStream) -> TokenStream {
        self.imp().emit_json_array_agg(inner)
    }

    fn emit_json_embed(&self, inner: &TokenStream) -> TokenStream {
        self.imp().emit_json_embed(inner)
    }

    fn emit_json_comparable(&self, inner: &TokenStream) -> TokenStream {
        self.imp().emit_json_comparable(inner)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.imp().remap_function(name)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.imp().name())
    }
}
