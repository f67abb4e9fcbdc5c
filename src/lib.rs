//! # jsonapi-sql
//!
//! Compiles JSON:API documents over a relational schema into a single SQL
//! statement per document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Schema (Catalog + AliasRegistry + Settings)       │
//! │     (entities, columns, relationships, type aliases)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [JsonApi::select]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Planner: include paths → correlated / anchored joins   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [document]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Query AST: json objects, list aggregates, UNION     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │     SQL text (PostgreSQL, SQLite, MySQL, DuckDB)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use jsonapi_sql::prelude::*;
//!
//! let mut builder = CatalogBuilder::new();
//! builder
//!     .entity("Article", "article")
//!     .primary_key("id")
//!     .column("name")
//!     .foreign_key("category_id", "category", "id")
//!     .to_one("category", "Category", [("category_id", "id")]);
//! builder.entity("Category", "category").primary_key("id").column("name");
//! let catalog = builder.build().unwrap();
//!
//! let registry = AliasRegistry::pluralized(&catalog).unwrap();
//! let api = JsonApi::new(catalog, registry, Settings::default());
//!
//! let fields = FieldSelection::new().with("articles", ["name", "category"]);
//! let query = api
//!     .select(&Dialect::Postgres, api.root("articles").unwrap(), Some(&fields), Some(&["category"]))
//!     .unwrap();
//! assert!(query.to_sql().starts_with("SELECT\n  JSON_BUILD_OBJECT('data'"));
//! ```

pub mod alias;
pub mod config;
pub mod document;
pub mod error;
pub mod planner;
pub mod schema;
pub mod session;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::alias::{AliasError, AliasRegistry};
    pub use crate::config::{Settings, SettingsError};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::document::{
        Document, DocumentQuery, FieldSelection, JsonApi, RelationshipData, ResourceIdentifier,
        ResourceObject,
    };
    pub use crate::error::{BuildError, Result};
    pub use crate::expr::{
        // Constructors
        and_all,
        col,
        lit_bool,
        lit_float,
        lit_int,
        lit_null,
        lit_str,
        table_col,
        // Types
        Expr,
        ExprExt,
    };
    pub use crate::query::{Query, TableRef};
    pub use crate::schema::{
        Cardinality, Catalog, CatalogBuilder, CatalogError, EntityId, SchemaFile,
    };
    pub use crate::session::{fetch_document, fetch_value, Session, SessionError};
}

// Also export at crate root for convenience
pub use alias::AliasRegistry;
pub use config::Settings;
pub use dialect::Dialect;
pub use document::{Document, DocumentQuery, FieldSelection, JsonApi};
pub use error::{BuildError, Result};
pub use schema::{Catalog, CatalogBuilder, EntityId};
pub use session::Session;
