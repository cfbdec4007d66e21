//! MySQL / MariaDB introspection through `information_schema`.
//!
//! `mysql_async` is the only driver in the stack, so each call is driven to
//! completion on a private current-thread runtime; the port stays blocking.

use mysql_async::{Conn, Opts, OptsBuilder, Row, prelude::Queryable};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, instrument, warn};

use devtools_core::{
    application::ports::SchemaIntrospector,
    domain::{Adapter, Column, DatabaseSettings, DomainError, ForeignKeyReference},
    error::DevtoolsResult,
};

use super::{ReferenceRow, connection_failed, group_references, introspection_failed};

const LIST_TABLES: &str = "\
    SELECT TABLE_NAME \
    FROM information_schema.TABLES \
    WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' \
    ORDER BY TABLE_NAME";

const DESCRIBE_COLUMNS: &str = "\
    SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, CHARACTER_MAXIMUM_LENGTH, COLUMN_KEY, EXTRA \
    FROM information_schema.COLUMNS \
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
    ORDER BY ORDINAL_POSITION";

const DESCRIBE_REFERENCES: &str = "\
    SELECT CONSTRAINT_NAME, COLUMN_NAME, REFERENCED_TABLE_SCHEMA, \
           REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME \
    FROM information_schema.KEY_COLUMN_USAGE \
    WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND REFERENCED_TABLE_NAME IS NOT NULL \
    ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION";

pub struct MysqlIntrospector {
    runtime: Runtime,
    conn: Option<Conn>,
}

impl MysqlIntrospector {
    #[instrument(skip_all)]
    pub fn connect(settings: &DatabaseSettings) -> DevtoolsResult<Self> {
        let opts = connection_opts(settings)?;
        debug!(host = %opts.ip_or_hostname(), port = opts.tcp_port(), "connecting");

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| connection_failed(Adapter::Mysql, e))?;
        let conn = runtime
            .block_on(Conn::new(opts))
            .map_err(|e| connection_failed(Adapter::Mysql, e))?;

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }

    fn exec(&mut self, sql: &str, params: Vec<String>, subject: &str) -> DevtoolsResult<Vec<Row>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| connection_failed(Adapter::Mysql, "connection already closed"))?;
        self.runtime
            .block_on(conn.exec(sql, params))
            .map_err(|e| introspection_failed(subject, e))
    }
}

impl Drop for MysqlIntrospector {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = self.runtime.block_on(conn.disconnect()) {
                warn!(error = %e, "closing the MySQL connection failed");
            }
        }
    }
}

/// Driver options for `settings`; host defaults to `localhost`, port to 3306.
pub(crate) fn connection_opts(settings: &DatabaseSettings) -> DevtoolsResult<Opts> {
    let dbname = settings
        .dbname
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or(DomainError::MissingRequiredField {
            field: "database.dbname",
        })?;

    let builder = OptsBuilder::default()
        .ip_or_hostname(settings.host.as_deref().unwrap_or("localhost"))
        .tcp_port(settings.port_or_default().unwrap_or(3306))
        .user(settings.username.as_deref())
        .pass(settings.password.as_deref())
        .db_name(Some(dbname));
    Ok(Opts::from(builder))
}

impl SchemaIntrospector for MysqlIntrospector {
    fn adapter(&self) -> Adapter {
        Adapter::Mysql
    }

    #[instrument(skip(self))]
    fn list_tables(&mut self, schema: &str) -> DevtoolsResult<Vec<String>> {
        let rows = self.exec(LIST_TABLES, vec![schema.to_string()], schema)?;
        rows.into_iter()
            .map(|row| {
                text(&row, 0).ok_or_else(|| introspection_failed(schema, "missing TABLE_NAME"))
            })
            .collect()
    }

    #[instrument(skip(self))]
    fn describe_columns(&mut self, table: &str, schema: &str) -> DevtoolsResult<Vec<Column>> {
        let rows = self.exec(
            DESCRIBE_COLUMNS,
            vec![schema.to_string(), table.to_string()],
            table,
        )?;
        rows.iter().map(|row| column_from_row(row, table)).collect()
    }

    #[instrument(skip(self))]
    fn describe_references(
        &mut self,
        table: &str,
        schema: &str,
    ) -> DevtoolsResult<Vec<ForeignKeyReference>> {
        let rows = self.exec(
            DESCRIBE_REFERENCES,
            vec![schema.to_string(), table.to_string()],
            table,
        )?;
        let rows = rows
            .iter()
            .map(|row| reference_from_row(row, table))
            .collect::<DevtoolsResult<Vec<_>>>()?;
        Ok(group_references(rows))
    }
}

/// Column `index` as text; information_schema values may come back as bytes.
fn text(row: &Row, index: usize) -> Option<String> {
    row.get_opt::<Option<String>, _>(index)
        .and_then(Result::ok)
        .flatten()
}

fn column_from_row(row: &Row, table: &str) -> DevtoolsResult<Column> {
    let required = |index: usize, name: &str| {
        text(row, index).ok_or_else(|| introspection_failed(table, format!("missing {name}")))
    };

    let mut column = Column::new(required(0, "COLUMN_NAME")?, required(1, "COLUMN_TYPE")?);
    if text(row, 2).as_deref() == Some("NO") {
        column = column.not_null();
    }
    let length = row
        .get_opt::<Option<u64>, _>(3)
        .and_then(Result::ok)
        .flatten()
        .and_then(|l| u32::try_from(l).ok());
    if let Some(length) = length {
        column = column.size(length);
    }
    if text(row, 4).as_deref() == Some("PRI") {
        column = column.primary();
    }
    if text(row, 5).is_some_and(|extra| extra.contains("auto_increment")) {
        column = column.auto_increment();
    }
    Ok(column)
}

fn reference_from_row(row: &Row, table: &str) -> DevtoolsResult<ReferenceRow> {
    let required = |index: usize, name: &str| {
        text(row, index).ok_or_else(|| introspection_failed(table, format!("missing {name}")))
    };

    Ok(ReferenceRow {
        constraint: required(0, "CONSTRAINT_NAME")?,
        column: required(1, "COLUMN_NAME")?,
        referenced_schema: text(row, 2),
        referenced_table: required(3, "REFERENCED_TABLE_NAME")?,
        referenced_column: required(4, "REFERENCED_COLUMN_NAME")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::error::DevtoolsError;

    fn settings() -> DatabaseSettings {
        DatabaseSettings {
            adapter: "Mysql".into(),
            dbname: Some("shop".into()),
            ..DatabaseSettings::default()
        }
    }

    #[test]
    fn defaults_host_and_port() {
        let opts = connection_opts(&settings()).unwrap();
        assert_eq!(opts.ip_or_hostname(), "localhost");
        assert_eq!(opts.tcp_port(), 3306);
        assert_eq!(opts.db_name(), Some("shop"));
        assert_eq!(opts.user(), None);
    }

    #[test]
    fn uses_configured_credentials() {
        let settings = DatabaseSettings {
            host: Some("10.0.0.7".into()),
            port: Some(3307),
            username: Some("root".into()),
            password: Some("secret".into()),
            ..settings()
        };
        let opts = connection_opts(&settings).unwrap();
        assert_eq!(opts.ip_or_hostname(), "10.0.0.7");
        assert_eq!(opts.tcp_port(), 3307);
        assert_eq!(opts.user(), Some("root"));
        assert_eq!(opts.pass(), Some("secret"));
    }

    #[test]
    fn dbname_is_required() {
        let settings = DatabaseSettings {
            dbname: Some("  ".into()),
            ..settings()
        };
        let err = connection_opts(&settings).unwrap_err();
        assert!(matches!(
            err,
            DevtoolsError::Domain(DomainError::MissingRequiredField { field: "database.dbname" })
        ));
    }
}
