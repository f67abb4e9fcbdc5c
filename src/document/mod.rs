//! Document compilation.
//!
//! [`JsonApi::select`] turns a root entity, a sparse field selection and a set
//! of include paths into one SQL statement. Executing it yields a single row
//! with a single column: the whole document as JSON.
//!
//! ```text
//! SELECT json_object(
//!   'data',     (SELECT <list agg>(main_json.json_object)
//!                FROM (SELECT <resource object> AS json_object
//!                      FROM root AS root_n [WHERE filter]) AS main_json),
//!   'included', (SELECT <list agg>(included.json_object)
//!                FROM (member_1 UNION member_2 UNION ...) AS included)
//! ) AS document
//! ```

pub mod fields;
pub mod included;
pub mod model;
pub mod resource;

use tracing::{debug, instrument, Level};

use crate::alias::AliasRegistry;
use crate::config::Settings;
use crate::error::Result;
use crate::planner::AliasArena;
use crate::schema::{Catalog, EntityId, EntityType};
use crate::session::Session;
use crate::sql::dialect::Dialect;
use crate::sql::expr::{json_array_agg, json_embed, json_object, table_col, Expr, ExprExt};
use crate::sql::query::{Query, TableRef};

pub use fields::FieldSelection;
pub use model::{Document, RelationshipData, RelationshipObject, ResourceIdentifier, ResourceObject};
pub use resource::ResourceBuilder;

/// Predicate over the root rows, given the root's SQL alias.
pub type RootFilter<'f> = &'f dyn Fn(&str) -> Expr;

/// Derived-table alias of the root rows.
const MAIN_ALIAS: &str = "main_json";

/// Column of the compiled statement holding the document.
pub const DOCUMENT_COLUMN: &str = "document";

// ============================================================================
// Compiled query
// ============================================================================

/// A compiled, unexecuted document query.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DocumentQuery has no effect until rendered with to_sql() or executed"]
pub struct DocumentQuery {
    query: Query,
    dialect: Dialect,
}

impl DocumentQuery {
    /// SQL text for the session's dialect.
    pub fn to_sql(&self) -> String {
        self.query.to_sql(self.dialect)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The statement, for composing into a larger query.
    pub fn into_query(self) -> Query {
        self.query
    }
}

impl std::fmt::Display for DocumentQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Document compiler over one schema.
///
/// Holds only read-only state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct JsonApi {
    catalog: Catalog,
    registry: AliasRegistry,
    settings: Settings,
}

impl JsonApi {
    pub fn new(catalog: Catalog, registry: AliasRegistry, settings: Settings) -> Self {
        Self {
            catalog,
            registry,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The entity registered under `alias`.
    pub fn root(&self, alias: &str) -> Result<EntityId> {
        self.registry.entity_of(alias)
    }

    /// Compile a document over every row of `root`.
    ///
    /// `fields = None` emits only `id` and `type` for the root. `include =
    /// None` or an empty slice omits `included`.
    #[instrument(level = "debug", skip(self, session, fields), fields(dialect = %session.dialect()))]
    pub fn select(
        &self,
        session: &impl Session,
        root: EntityId,
        fields: Option<&FieldSelection>,
        include: Option<&[&str]>,
    ) -> Result<DocumentQuery> {
        self.compile(session.dialect(), root, fields, include, None)
    }

    /// Like [`JsonApi::select`], restricted to root rows matching `filter`.
    ///
    /// `filter` receives the SQL alias the root table is bound to. It narrows
    /// `data` and every included member alike.
    #[instrument(level = "debug", skip(self, session, fields, filter), fields(dialect = %session.dialect()))]
    pub fn select_where<F>(
        &self,
        session: &impl Session,
        root: EntityId,
        fields: Option<&FieldSelection>,
        include: Option<&[&str]>,
        filter: F,
    ) -> Result<DocumentQuery>
    where
        F: Fn(&str) -> Expr,
    {
        self.compile(session.dialect(), root, fields, include, Some(&filter))
    }

    fn compile(
        &self,
        dialect: Dialect,
        root: EntityId,
        fields: Option<&FieldSelection>,
        include: Option<&[&str]>,
        filter: Option<RootFilter<'_>>,
    ) -> Result<DocumentQuery> {
        if let Some(fields) = fields {
            fields.validate(&self.registry)?;
        }

        let root = self.catalog.entity(root);
        let builder = ResourceBuilder::new(
            &self.catalog,
            &self.registry,
            fields,
            self.settings.strict_fields,
        );
        let mut arena = AliasArena::new();

        let mut document = vec![(
            "data".to_string(),
            self.build_root_data(&mut arena, &builder, root, filter)?,
        )];

        if let Some(included) = included::build_included(
            &mut arena,
            &self.catalog,
            &builder,
            root,
            include.unwrap_or_default(),
            filter,
        )? {
            document.push(("included".to_string(), included));
        }

        let query = Query::new().select(vec![json_object(document).alias(DOCUMENT_COLUMN)]);
        let compiled = DocumentQuery { query, dialect };

        if self.settings.log_sql && tracing::enabled!(Level::DEBUG) {
            debug!(sql = %compiled.to_sql(), aliases = arena.minted(), "compiled document query");
        }

        Ok(compiled)
    }

    /// `data`: the resource objects of every (filtered) root row.
    fn build_root_data(
        &self,
        arena: &mut AliasArena,
        builder: &ResourceBuilder<'_>,
        root: &EntityType,
        filter: Option<RootFilter<'_>>,
    ) -> Result<Expr> {
        let root_alias = arena.fresh(root.table());
        let object = builder.resource_object(arena, root, &root_alias)?;

        let mut rows = Query::new()
            .select(vec![object.alias(included::MEMBER_COLUMN)])
            .from(root.table_ref(&root_alias));
        if let Some(filter) = filter {
            rows = rows.filter(filter(&root_alias));
        }

        let data = Query::new()
            .select(vec![json_array_agg(table_col(MAIN_ALIAS, included::MEMBER_COLUMN))])
            .from(TableRef::derived(rows, MAIN_ALIAS));

        Ok(json_embed(data))
    }
}
