//! Model specification: everything a renderer needs to emit one model file.

use crate::domain::entities::relation::RelationSpec;
use crate::domain::entities::schema::Column;
use crate::domain::error::DomainError;
use crate::domain::naming::{camelize, is_identifier, is_namespace, lower_camelize};

/// Base class used when `--extends` is not given.
pub const DEFAULT_BASE_CLASS: &str = "\\Phalcon\\Mvc\\Model";

/// Prefix added to class names of abstract models.
pub const ABSTRACT_PREFIX: &str = "Abstract";

/// Generation switches; all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelFlags {
    /// Protected properties with getters and setters (`--get-set`).
    pub accessors: bool,
    /// Static `find`/`findFirst` doc methods (`--doc`).
    pub doc: bool,
    /// `@Column`/`@Primary` annotation docblocks (`--annotate`).
    pub annotate: bool,
    /// camelCase property names (`--camelize`).
    pub camelize: bool,
    /// `columnMap()` method (`--mapcolumn`).
    pub map_column: bool,
    /// `abstract` class with `Abstract` prefix (`--abstract`).
    pub abstract_class: bool,
}

/// Class name for a table: `Abstract` prefix only when the flag is set.
pub fn class_name_for(table: &str, abstract_class: bool) -> String {
    let base = camelize(table);
    if abstract_class {
        format!("{ABSTRACT_PREFIX}{base}")
    } else {
        base
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub table: String,
    pub schema: Option<String>,
    pub class_name: String,
    pub namespace: Option<String>,
    pub extends: String,
    pub excluded_fields: Vec<String>,
    pub columns: Vec<Column>,
    pub relations: Vec<RelationSpec>,
    pub flags: ModelFlags,
}

impl ModelSpec {
    pub fn builder(table: impl Into<String>) -> ModelSpecBuilder {
        ModelSpecBuilder {
            table: table.into(),
            ..ModelSpecBuilder::default()
        }
    }

    /// `<ClassName>.php`
    pub fn file_name(&self) -> String {
        format!("{}.php", self.class_name)
    }

    /// Columns that become properties (excluded fields removed).
    pub fn fields(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| !self.excluded_fields.iter().any(|e| e == &c.name))
    }

    /// Property name for a column, honoring `--camelize`.
    pub fn property_name(&self, column: &str) -> String {
        if self.flags.camelize {
            lower_camelize(column)
        } else {
            column.to_string()
        }
    }

    /// Namespace without a leading backslash.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .map(|ns| ns.strip_prefix('\\').unwrap_or(ns))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.table.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "table" });
        }
        if !is_identifier(&self.class_name) {
            return Err(DomainError::InvalidIdentifier {
                kind: "class name",
                value: self.class_name.clone(),
            });
        }
        if let Some(ns) = self.namespace.as_ref().filter(|ns| !is_namespace(ns)) {
            return Err(DomainError::InvalidIdentifier {
                kind: "namespace",
                value: ns.clone(),
            });
        }
        for column in self.fields() {
            let property = self.property_name(&column.name);
            if !is_identifier(&property) {
                return Err(DomainError::InvalidIdentifier {
                    kind: "property name",
                    value: property,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ModelSpecBuilder {
    table: String,
    schema: Option<String>,
    class_name: Option<String>,
    namespace: Option<String>,
    extends: Option<String>,
    excluded_fields: Vec<String>,
    columns: Vec<Column>,
    relations: Vec<RelationSpec>,
    flags: ModelFlags,
}

impl ModelSpecBuilder {
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    pub fn namespace(mut self, ns: Option<String>) -> Self {
        self.namespace = ns.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn extends(mut self, base: Option<String>) -> Self {
        self.extends = base.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn exclude(mut self, fields: Vec<String>) -> Self {
        self.excluded_fields = fields;
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn relations(mut self, relations: Vec<RelationSpec>) -> Self {
        self.relations = relations;
        self
    }

    pub fn flags(mut self, flags: ModelFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Result<ModelSpec, DomainError> {
        let class_name = self
            .class_name
            .unwrap_or_else(|| class_name_for(&self.table, self.flags.abstract_class));

        let spec = ModelSpec {
            table: self.table,
            schema: self.schema,
            class_name,
            namespace: self.namespace,
            extends: self.extends.unwrap_or_else(|| DEFAULT_BASE_CLASS.to_string()),
            excluded_fields: self.excluded_fields,
            columns: self.columns,
            relations: self.relations,
            flags: self.flags,
        };
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let spec = ModelSpec::builder("blog_posts").build().unwrap();
        assert_eq!(spec.class_name, "BlogPosts");
        assert_eq!(spec.extends, DEFAULT_BASE_CLASS);
        assert_eq!(spec.file_name(), "BlogPosts.php");
        assert!(spec.namespace.is_none());
    }

    #[test]
    fn abstract_prefix_only_with_flag() {
        assert_eq!(class_name_for("users", false), "Users");
        assert_eq!(class_name_for("users", true), "AbstractUsers");
    }

    #[test]
    fn excluded_fields_are_not_properties() {
        let spec = ModelSpec::builder("users")
            .columns(vec![Column::new("id", "int"), Column::new("password", "varchar(60)")])
            .exclude(vec!["password".into()])
            .build()
            .unwrap();
        let names: Vec<_> = spec.fields().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id"]);
    }

    #[test]
    fn camelize_changes_property_names() {
        let flags = ModelFlags {
            camelize: true,
            ..ModelFlags::default()
        };
        let spec = ModelSpec::builder("users").flags(flags).build().unwrap();
        assert_eq!(spec.property_name("created_at"), "createdAt");
    }

    #[test]
    fn rejects_invalid_namespace_and_class() {
        let bad_ns = ModelSpec::builder("users")
            .namespace(Some("App\\\\Models".into()))
            .build();
        assert!(matches!(bad_ns, Err(DomainError::InvalidIdentifier { kind: "namespace", .. })));

        let bad_class = ModelSpec::builder("users").class_name("1Users").build();
        assert!(bad_class.is_err());
    }

    #[test]
    fn blank_namespace_is_dropped() {
        let spec = ModelSpec::builder("users")
            .namespace(Some("  ".into()))
            .build()
            .unwrap();
        assert!(spec.namespace.is_none());
    }
}
