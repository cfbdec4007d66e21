//! Database introspection, one module per dialect.
//!
//! [`connect`] maps the configured adapter name onto a driver. Each dialect
//! sits behind a cargo feature (`sqlite`, `postgres`, `mysql`); an adapter
//! whose feature is disabled fails to connect instead of failing to parse.

use std::path::Path;

use tracing::{info, instrument};

use devtools_core::{
    application::{ApplicationError, ports::SchemaIntrospector},
    domain::{Adapter, DatabaseSettings, ForeignKeyReference},
    error::{DevtoolsError, DevtoolsResult},
};

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MysqlIntrospector;
#[cfg(feature = "postgres")]
pub use postgres::PostgresIntrospector;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteIntrospector;

/// Open an introspector for `settings.adapter`.
///
/// An unknown adapter name fails here, before anything is written. Relative
/// SQLite paths are resolved against `root`.
#[instrument(skip_all, fields(adapter = %settings.adapter))]
pub fn connect(
    settings: &DatabaseSettings,
    root: &Path,
) -> DevtoolsResult<Box<dyn SchemaIntrospector>> {
    let adapter = settings.adapter()?;
    let introspector: Box<dyn SchemaIntrospector> = match adapter {
        #[cfg(feature = "sqlite")]
        Adapter::Sqlite => Box::new(SqliteIntrospector::open(settings, root)?),
        #[cfg(feature = "postgres")]
        Adapter::Postgresql => Box::new(PostgresIntrospector::connect(settings)?),
        #[cfg(feature = "mysql")]
        Adapter::Mysql => Box::new(MysqlIntrospector::connect(settings)?),
        #[allow(unreachable_patterns)]
        other => return Err(not_compiled_in(other)),
    };
    info!(%adapter, "connected");
    Ok(introspector)
}

fn not_compiled_in(adapter: Adapter) -> DevtoolsError {
    connection_failed(adapter, "support for this adapter was not compiled in")
}

pub(crate) fn connection_failed(adapter: Adapter, err: impl std::fmt::Display) -> DevtoolsError {
    ApplicationError::ConnectionFailed {
        adapter: adapter.to_string(),
        reason: err.to_string(),
    }
    .into()
}

pub(crate) fn introspection_failed(table: &str, err: impl std::fmt::Display) -> DevtoolsError {
    ApplicationError::IntrospectionFailed {
        table: table.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// One `(constraint, column)` pair as reported by the catalog.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceRow {
    pub constraint: String,
    pub column: String,
    pub referenced_schema: Option<String>,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Fold catalog rows into one reference per constraint, keeping the order in
/// which constraints first appear and the column order within each.
pub(crate) fn group_references(
    rows: impl IntoIterator<Item = ReferenceRow>,
) -> Vec<ForeignKeyReference> {
    let mut grouped: Vec<ForeignKeyReference> = Vec::new();
    for row in rows {
        match grouped.iter_mut().find(|r| r.name == row.constraint) {
            Some(reference) => {
                reference.columns.push(row.column);
                reference.referenced_columns.push(row.referenced_column);
            }
            None => {
                let mut reference = ForeignKeyReference::new(
                    row.constraint,
                    vec![row.column],
                    row.referenced_table,
                    vec![row.referenced_column],
                );
                reference.referenced_schema = row.referenced_schema;
                grouped.push(reference);
            }
        }
    }
    grouped
}
