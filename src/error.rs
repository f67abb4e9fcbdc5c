//! Errors raised while compiling a document query.
//!
//! Every variant is raised synchronously during construction, before any SQL
//! reaches the database.

/// Result type for document compilation.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while building a document query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An alias string with no registered entity, or an entity with no alias.
    #[error("Unknown alias: {0}")]
    UnknownAlias(String),

    /// A dotted include segment that is not a relationship of the current entity.
    #[error("Unknown relationship '{segment}' on entity {entity}")]
    UnknownRelationship { segment: String, entity: String },

    /// A selected field that is neither a column nor a relationship.
    #[error("Unknown field '{field}' on entity {entity}")]
    UnknownField { entity: String, field: String },

    #[error("Include set produced no members")]
    EmptyIncludeSet,
}
