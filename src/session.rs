//! Sessions and execution.
//!
//! A [`Session`] tells the compiler which dialect to emit. It is consulted
//! during the call and never retained. A `rusqlite::Connection` is a session,
//! and [`fetch_value`] / [`fetch_document`] run a compiled query on it.

use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::document::{Document, DocumentQuery};
use crate::sql::dialect::Dialect;

/// The context a document is compiled for.
pub trait Session {
    fn dialect(&self) -> Dialect;
}

impl Session for Dialect {
    fn dialect(&self) -> Dialect {
        *self
    }
}

/// Compile for the configured dialect without a connection.
impl Session for Settings {
    fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl Session for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}

/// Errors that can occur while executing a document query.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Query was compiled for {found}, session expects {expected}")]
    DialectMismatch { expected: Dialect, found: Dialect },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Execute `query` and parse the document cell.
#[instrument(level = "debug", skip_all, fields(dialect = %query.dialect()))]
pub fn fetch_value(conn: &Connection, query: &DocumentQuery) -> SessionResult<Value> {
    let expected = conn.dialect();
    if query.dialect() != expected {
        return Err(SessionError::DialectMismatch {
            expected,
            found: query.dialect(),
        });
    }

    let text: String = conn.query_row(&query.to_sql(), [], |row| row.get(0))?;
    debug!(bytes = text.len(), "fetched document");
    Ok(serde_json::from_str(&text)?)
}

/// Execute `query` and decode it into a [`Document`].
pub fn fetch_document(conn: &Connection, query: &DocumentQuery) -> SessionResult<Document> {
    Ok(serde_json::from_value(fetch_value(conn, query)?)?)
}
