//! PostgreSQL introspection through `information_schema`.
//!
//! Catalog columns are `sql_identifier`/`cardinal_number` domains, so every
//! selected value is cast to `text` or `int4` before it reaches the driver.
//! The referenced schema of a foreign key is reported as the catalog (the
//! database name), which is what relation inference compares against.

use postgres::{Client, Config, NoTls, Row};
use tracing::{debug, instrument};

use devtools_core::{
    application::ports::SchemaIntrospector,
    domain::{Adapter, Column, DatabaseSettings, DomainError, ForeignKeyReference},
    error::DevtoolsResult,
};

use super::{ReferenceRow, connection_failed, group_references, introspection_failed};

const LIST_TABLES: &str = "\
    SELECT table_name::text \
    FROM information_schema.tables \
    WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
    ORDER BY table_name";

const DESCRIBE_COLUMNS: &str = "\
    SELECT c.column_name::text, \
           c.data_type::text, \
           c.is_nullable::text = 'YES', \
           c.character_maximum_length::int4, \
           COALESCE(c.column_default::text, '') LIKE 'nextval(%' \
               OR COALESCE(c.is_identity::text, 'NO') = 'YES', \
           EXISTS ( \
               SELECT 1 \
               FROM information_schema.table_constraints tc \
               JOIN information_schema.key_column_usage kcu \
                 ON kcu.constraint_schema = tc.constraint_schema \
                AND kcu.constraint_name = tc.constraint_name \
               WHERE tc.constraint_type = 'PRIMARY KEY' \
                 AND tc.table_schema = c.table_schema \
                 AND tc.table_name = c.table_name \
                 AND kcu.column_name = c.column_name) \
    FROM information_schema.columns c \
    WHERE c.table_schema = $1 AND c.table_name = $2 \
    ORDER BY c.ordinal_position";

const DESCRIBE_REFERENCES: &str = "\
    SELECT kcu.constraint_name::text, \
           kcu.column_name::text, \
           rku.table_catalog::text, \
           rku.table_name::text, \
           rku.column_name::text \
    FROM information_schema.referential_constraints rc \
    JOIN information_schema.key_column_usage kcu \
      ON kcu.constraint_schema = rc.constraint_schema \
     AND kcu.constraint_name = rc.constraint_name \
    JOIN information_schema.key_column_usage rku \
      ON rku.constraint_schema = rc.unique_constraint_schema \
     AND rku.constraint_name = rc.unique_constraint_name \
     AND rku.ordinal_position = kcu.position_in_unique_constraint \
    WHERE kcu.table_schema = $1 AND kcu.table_name = $2 \
    ORDER BY kcu.constraint_name, kcu.ordinal_position";

pub struct PostgresIntrospector {
    client: Client,
}

impl PostgresIntrospector {
    #[instrument(skip_all)]
    pub fn connect(settings: &DatabaseSettings) -> DevtoolsResult<Self> {
        let config = connection_config(settings)?;
        debug!(hosts = ?config.get_hosts(), ports = ?config.get_ports(), "connecting");
        let client = config
            .connect(NoTls)
            .map_err(|e| connection_failed(Adapter::Postgresql, e))?;
        Ok(Self { client })
    }

    fn query(&mut self, sql: &str, schema: &str, table: &str) -> DevtoolsResult<Vec<Row>> {
        self.client
            .query(sql, &[&schema, &table])
            .map_err(|e| introspection_failed(table, e))
    }
}

/// Driver config for `settings`; host defaults to `localhost`, port to 5432.
pub(crate) fn connection_config(settings: &DatabaseSettings) -> DevtoolsResult<Config> {
    let dbname = settings
        .dbname
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or(DomainError::MissingRequiredField {
            field: "database.dbname",
        })?;

    let mut config = Config::new();
    config
        .host(settings.host.as_deref().unwrap_or("localhost"))
        .dbname(dbname)
        .application_name("phalcon-devtools");
    if let Some(port) = settings.port_or_default() {
        config.port(port);
    }
    if let Some(user) = settings.username.as_deref() {
        config.user(user);
    }
    if let Some(password) = settings.password.as_deref() {
        config.password(password);
    }
    Ok(config)
}

impl SchemaIntrospector for PostgresIntrospector {
    fn adapter(&self) -> Adapter {
        Adapter::Postgresql
    }

    #[instrument(skip(self))]
    fn list_tables(&mut self, schema: &str) -> DevtoolsResult<Vec<String>> {
        let rows = self
            .client
            .query(LIST_TABLES, &[&schema])
            .map_err(|e| introspection_failed(schema, e))?;
        rows.iter()
            .map(|row| row.try_get::<_, String>(0).map_err(|e| introspection_failed(schema, e)))
            .collect()
    }

    #[instrument(skip(self))]
    fn describe_columns(&mut self, table: &str, schema: &str) -> DevtoolsResult<Vec<Column>> {
        let rows = self.query(DESCRIBE_COLUMNS, schema, table)?;
        rows.iter()
            .map(|row| column_from_row(row).map_err(|e| introspection_failed(table, e)))
            .collect()
    }

    #[instrument(skip(self))]
    fn describe_references(
        &mut self,
        table: &str,
        schema: &str,
    ) -> DevtoolsResult<Vec<ForeignKeyReference>> {
        let rows = self.query(DESCRIBE_REFERENCES, schema, table)?;
        let rows = rows
            .iter()
            .map(|row| reference_from_row(row).map_err(|e| introspection_failed(table, e)))
            .collect::<DevtoolsResult<Vec<_>>>()?;
        Ok(group_references(rows))
    }
}

fn column_from_row(row: &Row) -> Result<Column, postgres::Error> {
    let mut column = Column::new(row.try_get::<_, String>(0)?, row.try_get::<_, String>(1)?);
    if !row.try_get::<_, bool>(2)? {
        column = column.not_null();
    }
    if let Some(length) = row.try_get::<_, Option<i32>>(3)? {
        if let Ok(size) = u32::try_from(length) {
            column = column.size(size);
        }
    }
    if row.try_get::<_, bool>(4)? {
        column = column.auto_increment();
    }
    if row.try_get::<_, bool>(5)? {
        column = column.primary();
    }
    Ok(column)
}

fn reference_from_row(row: &Row) -> Result<ReferenceRow, postgres::Error> {
    Ok(ReferenceRow {
        constraint: row.try_get(0)?,
        column: row.try_get(1)?,
        referenced_schema: row.try_get(2)?,
        referenced_table: row.try_get(3)?,
        referenced_column: row.try_get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::error::DevtoolsError;
    use postgres::config::Host;

    fn settings() -> DatabaseSettings {
        DatabaseSettings {
            adapter: "Postgresql".into(),
            dbname: Some("shop".into()),
            ..DatabaseSettings::default()
        }
    }

    #[test]
    fn defaults_host_and_port() {
        let config = connection_config(&settings()).unwrap();
        assert_eq!(config.get_hosts(), [Host::Tcp("localhost".into())]);
        assert_eq!(config.get_ports(), [5432]);
        assert_eq!(config.get_dbname(), Some("shop"));
        assert_eq!(config.get_user(), None);
    }

    #[test]
    fn uses_configured_credentials() {
        let settings = DatabaseSettings {
            host: Some("db.internal".into()),
            port: Some(6543),
            username: Some("phalcon".into()),
            password: Some("secret".into()),
            ..settings()
        };
        let config = connection_config(&settings).unwrap();
        assert_eq!(config.get_hosts(), [Host::Tcp("db.internal".into())]);
        assert_eq!(config.get_ports(), [6543]);
        assert_eq!(config.get_user(), Some("phalcon"));
        assert_eq!(config.get_password(), Some(&b"secret"[..]));
    }

    #[test]
    fn dbname_is_required() {
        let settings = DatabaseSettings {
            dbname: None,
            ..settings()
        };
        let err = connection_config(&settings).unwrap_err();
        assert!(matches!(
            err,
            DevtoolsError::Domain(DomainError::MissingRequiredField { field: "database.dbname" })
        ));
    }
}
