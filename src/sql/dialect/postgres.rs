//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Native boolean type (true/false)
//! - `json_build_object` / `json_agg` for document construction
//! - `json` has no equality operator, so UNION members are cast to `jsonb`

use super::helpers;
use super::SqlDialect;
use crate::sql::token::TokenStream;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn json_object_function(&self) -> &'static str {
        "JSON_BUILD_OBJECT"
    }

    // json_agg over zero rows is NULL
    fn emit_json_array_agg(&self, inner: &TokenStream) -> TokenStream {
        helpers::emit_coalesce_empty("JSON_AGG", inner, &helpers::empty_json_array_cast())
    }

    fn emit_json_comparable(&self, inner: &TokenStream) -> TokenStream {
        TokenStream::cast(inner, "JSONB")
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }
}
