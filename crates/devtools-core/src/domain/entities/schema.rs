//! Introspected database schema: tables, columns, foreign-key references.

use serde::Serialize;

/// Broad type family of a column, derived from its raw SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Decimal,
    Boolean,
    Text,
    DateTime,
    Binary,
    Other,
}

impl ColumnKind {
    /// Classify a raw type such as `int(11) unsigned`, `character varying`,
    /// or `NUMERIC(10,2)`.
    pub fn from_data_type(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let base = lowered
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();

        match base {
            "bool" | "boolean" => Self::Boolean,
            "tinyint" if lowered.starts_with("tinyint(1)") => Self::Boolean,
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2"
            | "int4" | "int8" | "serial" | "bigserial" | "smallserial" => Self::Integer,
            "decimal" | "numeric" | "float" | "double" | "real" | "float4" | "float8"
            | "money" => Self::Decimal,
            "char" | "varchar" | "character" | "text" | "tinytext" | "mediumtext"
            | "longtext" | "enum" | "set" | "json" | "jsonb" | "uuid" | "clob" => Self::Text,
            "date" | "datetime" | "timestamp" | "timestamptz" | "time" | "timetz" | "year"
            | "interval" => Self::DateTime,
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary"
            | "bytea" => Self::Binary,
            _ => Self::Other,
        }
    }

    /// Type name used in `@var` docblocks of generated models.
    pub const fn doc_type(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "double",
            Self::Boolean => "boolean",
            Self::Text | Self::DateTime | Self::Binary | Self::Other => "string",
        }
    }

    /// Type name used in `@Column(type=...)` annotations.
    pub const fn annotation_type(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Text => "string",
            Self::DateTime => "datetime",
            Self::Binary => "blob",
            Self::Other => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub primary: bool,
    pub auto_increment: bool,
    pub size: Option<u32>,
}

impl Column {
    /// Nullable, non-key column; refine with the builder methods below.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            kind: ColumnKind::from_data_type(&data_type),
            size: parse_size(&data_type),
            data_type,
            nullable: true,
            primary: false,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// `varchar(255)` → 255, `decimal(10,2)` → 10.
fn parse_size(data_type: &str) -> Option<u32> {
    let open = data_type.find('(')?;
    let rest = &data_type[open + 1..];
    let end = rest.find([',', ')'])?;
    rest[..end].trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyReference {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_schema: Option<String>,
    pub referenced_columns: Vec<String>,
}

impl ForeignKeyReference {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        referenced_table: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            referenced_table: referenced_table.into(),
            referenced_schema: None,
            referenced_columns,
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.referenced_schema = Some(schema.into());
        self
    }

    /// Single local column mapped to a single referenced column.
    pub fn single_column(&self) -> Option<(&str, &str)> {
        match (self.columns.as_slice(), self.referenced_columns.as_slice()) {
            ([local], [remote]) => Some((local, remote)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    pub schema: String,
    pub columns: Vec<Column>,
    pub references: Vec<ForeignKeyReference>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_reference(mut self, reference: ForeignKeyReference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary)
    }
}
