//! SQLite introspection via `sqlite_master` and PRAGMAs.
//!
//! The "schema" is the attached database name, `main` unless another file
//! was attached. References point into the same database, so their
//! referenced schema is the schema being read.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, instrument};

use devtools_core::{
    application::ports::SchemaIntrospector,
    domain::{Adapter, Column, DatabaseSettings, DomainError, ForeignKeyReference},
    error::DevtoolsResult,
};

use super::{ReferenceRow, connection_failed, group_references, introspection_failed};

pub struct SqliteIntrospector {
    conn: Connection,
}

impl SqliteIntrospector {
    /// Open `database.dbname` read-only; relative paths are taken from `root`.
    #[instrument(skip_all)]
    pub fn open(settings: &DatabaseSettings, root: &Path) -> DevtoolsResult<Self> {
        let dbname = settings
            .dbname
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or(DomainError::MissingRequiredField {
                field: "database.dbname",
            })?;

        let path = resolve_database_path(dbname, root);
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| connection_failed(Adapter::Sqlite, format!("{}: {e}", path.display())))?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection (in-memory databases in tests).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn primary_key_columns(&self, table: &str, schema: &str) -> DevtoolsResult<Vec<String>> {
        Ok(self
            .describe(table, schema)?
            .into_iter()
            .filter(|c| c.primary)
            .map(|c| c.name)
            .collect())
    }

    fn describe(&self, table: &str, schema: &str) -> DevtoolsResult<Vec<Column>> {
        let sql = format!("PRAGMA {}.table_info({})", quote(schema), quote(table));
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| introspection_failed(table, e))?;

        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)? != 0,
                    row.get::<_, i64>(5)?,
                ))
            })
            .map_err(|e| introspection_failed(table, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| introspection_failed(table, e))?;

        let key_count = raw.iter().filter(|(_, _, _, pk)| *pk > 0).count();
        let columns = raw
            .into_iter()
            .map(|(name, data_type, not_null, pk)| {
                // A lone INTEGER PRIMARY KEY aliases the rowid.
                let rowid = pk > 0 && key_count == 1 && data_type.eq_ignore_ascii_case("integer");
                let mut column = Column::new(name, data_type);
                if not_null {
                    column = column.not_null();
                }
                if pk > 0 {
                    column = column.primary();
                }
                if rowid {
                    column = column.auto_increment();
                }
                column
            })
            .collect();
        Ok(columns)
    }
}

impl SchemaIntrospector for SqliteIntrospector {
    fn adapter(&self) -> Adapter {
        Adapter::Sqlite
    }

    #[instrument(skip(self))]
    fn list_tables(&mut self, schema: &str) -> DevtoolsResult<Vec<String>> {
        let sql = format!(
            "SELECT name FROM {}.sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            quote(schema)
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| introspection_failed(schema, e))?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| introspection_failed(schema, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| introspection_failed(schema, e))?;
        Ok(tables)
    }

    #[instrument(skip(self))]
    fn describe_columns(&mut self, table: &str, schema: &str) -> DevtoolsResult<Vec<Column>> {
        self.describe(table, schema)
    }

    #[instrument(skip(self))]
    fn describe_references(
        &mut self,
        table: &str,
        schema: &str,
    ) -> DevtoolsResult<Vec<ForeignKeyReference>> {
        let sql = format!("PRAGMA {}.foreign_key_list({})", quote(schema), quote(table));
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| introspection_failed(table, e))?;

        // (id, seq, referenced table, from, to)
        let mut raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .map_err(|e| introspection_failed(table, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| introspection_failed(table, e))?;
        drop(stmt);

        // PRAGMA lists constraints last-declared first.
        raw.sort_by_key(|(id, seq, ..)| (*id, *seq));

        let mut rows: Vec<(i64, ReferenceRow)> = Vec::with_capacity(raw.len());
        let mut unresolved = Vec::new();
        for (id, seq, referenced_table, column, to) in raw {
            // `REFERENCES users` without a column list targets the primary key.
            let referenced_column = match to {
                Some(to) => Some(to),
                None => self
                    .primary_key_columns(&referenced_table, schema)?
                    .into_iter()
                    .nth(usize::try_from(seq).unwrap_or_default()),
            };
            let Some(referenced_column) = referenced_column else {
                debug!(
                    %table,
                    %referenced_table,
                    %column,
                    "reference target has no primary key, skipped"
                );
                unresolved.push(id);
                continue;
            };
            rows.push((id, ReferenceRow {
                constraint: format!("fk_{table}_{id}"),
                column,
                referenced_schema: Some(schema.to_string()),
                referenced_table,
                referenced_column,
            }));
        }
        Ok(group_references(
            rows.into_iter()
                .filter(|(id, _)| !unresolved.contains(id))
                .map(|(_, row)| row),
        ))
    }
}

fn resolve_database_path(dbname: &str, root: &Path) -> PathBuf {
    let path = Path::new(dbname);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::{
        application::ApplicationError,
        domain::ColumnKind,
        error::DevtoolsError,
    };

    const BLOG: &str = "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            email VARCHAR(120) NOT NULL,
            created_at DATETIME
        );
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            parent_id INTEGER REFERENCES posts,
            title TEXT
        );
        CREATE TABLE tags (post_id INTEGER, name TEXT, PRIMARY KEY (post_id, name));
        CREATE TABLE post_tags (
            post_id INTEGER,
            tag TEXT,
            FOREIGN KEY (post_id, tag) REFERENCES tags(post_id, name)
        );
    ";

    fn blog() -> SqliteIntrospector {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(BLOG).unwrap();
        SqliteIntrospector::from_connection(conn)
    }

    #[test]
    fn lists_tables_alphabetically() {
        let tables = blog().list_tables("main").unwrap();
        assert_eq!(tables, ["post_tags", "posts", "tags", "users"]);
    }

    #[test]
    fn describes_columns_in_declaration_order() {
        let columns = blog().describe_columns("users", "main").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "email", "created_at"]);

        let id = &columns[0];
        assert!(id.primary && id.auto_increment && !id.nullable);
        assert_eq!(id.kind, ColumnKind::Integer);

        let email = &columns[1];
        assert!(!email.nullable);
        assert_eq!(email.size, Some(120));
        assert_eq!(columns[2].kind, ColumnKind::DateTime);
    }

    #[test]
    fn composite_keys_are_not_rowid_aliases() {
        let columns = blog().describe_columns("tags", "main").unwrap();
        assert!(columns.iter().all(|c| c.primary && !c.auto_increment));
    }

    #[test]
    fn describes_references_with_implicit_target() {
        let refs = blog().describe_references("posts", "main").unwrap();
        assert_eq!(refs.len(), 2);

        let user = refs.iter().find(|r| r.referenced_table == "users").unwrap();
        assert_eq!(user.single_column(), Some(("user_id", "id")));
        assert_eq!(user.referenced_schema.as_deref(), Some("main"));

        let parent = refs.iter().find(|r| r.referenced_table == "posts").unwrap();
        assert_eq!(parent.single_column(), Some(("parent_id", "id")));
    }

    #[test]
    fn multi_column_reference_is_one_constraint() {
        let refs = blog().describe_references("post_tags", "main").unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].columns, ["post_id", "tag"]);
        assert_eq!(refs[0].referenced_columns, ["post_id", "name"]);
        assert!(refs[0].single_column().is_none());
    }

    #[test]
    fn reference_to_table_without_primary_key_is_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE logs (message TEXT);
             CREATE TABLE users (id INTEGER PRIMARY KEY);
             CREATE TABLE audits (
                 id INTEGER PRIMARY KEY,
                 log_id INTEGER REFERENCES logs,
                 user_id INTEGER REFERENCES users
             );",
        )
        .unwrap();

        let refs = SqliteIntrospector::from_connection(conn)
            .describe_references("audits", "main")
            .unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].referenced_table, "users");
        assert_eq!(refs[0].single_column(), Some(("user_id", "id")));
    }

    #[test]
    fn missing_database_file_is_a_connection_failure() {
        let settings = DatabaseSettings {
            adapter: "Sqlite".into(),
            dbname: Some("no/such/file.sqlite".into()),
            ..DatabaseSettings::default()
        };
        let err = match SqliteIntrospector::open(&settings, Path::new("/nonexistent")) {
            Err(e) => e,
            Ok(_) => panic!("opened a missing file"),
        };
        assert!(matches!(
            err,
            DevtoolsError::Application(ApplicationError::ConnectionFailed { .. })
        ));
    }

    #[test]
    fn opens_relative_paths_from_the_project_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let conn = Connection::open(temp.path().join("blog.sqlite")).unwrap();
        conn.execute_batch(BLOG).unwrap();
        drop(conn);

        let settings = DatabaseSettings {
            adapter: "Sqlite".into(),
            dbname: Some("blog.sqlite".into()),
            ..DatabaseSettings::default()
        };
        let mut introspector = SqliteIntrospector::open(&settings, temp.path()).unwrap();
        assert_eq!(introspector.adapter(), Adapter::Sqlite);
        assert_eq!(introspector.list_tables("main").unwrap().len(), 4);
    }
}
