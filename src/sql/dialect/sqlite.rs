//! SQLite SQL dialect.
//!
//! SQLite differences from ANSI:
//! - No boolean type, returns 1/0
//! - Compound SELECT operands cannot be parenthesized
//! - JSON values are text with a transient subtype. The subtype is lost once a
//!   value crosses a subquery boundary, so embedded results are re-parsed with
//!   `json()`. `json()` also canonicalizes text, which makes UNION dedup work.

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn supports_parenthesized_set_operands(&self) -> bool {
        false
    }

    // json_group_array already yields '[]' for zero rows
    fn emit_json_array_agg(&self, inner: &TokenStream) -> TokenStream {
        TokenStream::call("JSON_GROUP_ARRAY", &TokenStream::call("JSON", inner))
    }

    fn emit_json_embed(&self, inner: &TokenStream) -> TokenStream {
        TokenStream::call("JSON", inner)
    }

    fn emit_json_comparable(&self, inner: &TokenStream) -> TokenStream {
        TokenStream::call("JSON", inner)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_sqlite(name)
    }
}
