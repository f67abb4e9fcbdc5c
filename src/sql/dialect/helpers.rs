//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, SQLite, DuckDB
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Postgres, DuckDB
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: MySQL, SQLite
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT n` (standard SQL).
/// Used by: all dialects
pub fn emit_limit_standard(limit: u32) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Limit)
        .space()
        .push(Token::LitInt(i64::from(limit)));
    ts
}

// =============================================================================
// JSON
// =============================================================================

/// `COALESCE(<agg>(<inner>), <empty>)`.
/// Used by: aggregates whose zero-row result is NULL (Postgres, MySQL, DuckDB)
pub fn emit_coalesce_empty(agg: &str, inner: &TokenStream, empty: &TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("COALESCE".into()))
        .lparen()
        .append(&TokenStream::call(agg, inner))
        .comma()
        .space()
        .append(empty)
        .rparen();
    ts
}

/// `CAST('[]' AS JSON)` - the empty JSON array.
/// Used by: Postgres, DuckDB
pub fn empty_json_array_cast() -> TokenStream {
    let mut literal = TokenStream::new();
    literal.push(Token::LitString("[]".into()));
    TokenStream::cast(&literal, "JSON")
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for Postgres dialect.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "JSON_OBJECT" => Some("JSON_BUILD_OBJECT"),
        _ => None,
    }
}

/// Remap functions for SQLite dialect.
pub fn remap_function_sqlite(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "JSON_BUILD_OBJECT" => Some("JSON_OBJECT"),
        _ => None,
    }
}

/// Remap functions for DuckDB dialect.
pub fn remap_function_duckdb(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "JSON_BUILD_OBJECT" => Some("JSON_OBJECT"),
        _ => None,
    }
}

/// Remap functions for MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "JSON_BUILD_OBJECT" => Some("JSON_OBJECT"),
        _ => None,
    }
}
