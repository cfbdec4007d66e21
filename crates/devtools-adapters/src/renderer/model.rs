//! PHP model source emitter.
//!
//! Produces one ORM model class per [`ModelSpec`]. Layout of the output:
//! namespace, class docblock, properties, accessors, `initialize()`,
//! optional `find`/`findFirst`, optional `columnMap()`.

use chrono::Local;
use tracing::{instrument, trace};

use devtools_core::{
    VERSION,
    application::ports::ModelRenderer,
    domain::{Column, ModelSpec, RelationKind, RelationSpec, naming::camelize},
    error::DevtoolsResult,
};

const INDENT: &str = "    ";

/// Renders models as PHP source.
#[derive(Debug, Clone, Default)]
pub struct PhpModelRenderer {
    /// Fixed `@date` for reproducible output; the current time when unset.
    timestamp: Option<String>,
}

impl PhpModelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
        }
    }

    fn timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Local::now().format("%Y-%m-%d, %H:%M:%S").to_string())
    }
}

impl ModelRenderer for PhpModelRenderer {
    #[instrument(skip_all, fields(table = %spec.table, class = %spec.class_name))]
    fn render(&self, spec: &ModelSpec) -> DevtoolsResult<String> {
        spec.validate()?;

        let mut out = Source::default();
        out.raw("<?php\n\n");
        if let Some(namespace) = spec.namespace() {
            out.raw(&format!("namespace {namespace};\n\n"));
        }

        header(&mut out, spec, &self.timestamp());
        let modifier = if spec.flags.abstract_class { "abstract " } else { "" };
        out.raw(&format!(
            "{modifier}class {} extends {}\n{{\n",
            spec.class_name, spec.extends
        ));

        for column in spec.fields() {
            property(&mut out, spec, column);
        }
        if spec.flags.accessors {
            for column in spec.fields() {
                setter(&mut out, spec, column);
            }
            for column in spec.fields() {
                getter(&mut out, spec, column);
            }
        }
        initialize(&mut out, spec);
        if spec.flags.doc {
            finders(&mut out, spec);
        }
        if spec.flags.map_column {
            column_map(&mut out, spec);
        }

        out.raw("}\n");
        trace!(bytes = out.text.len(), "model rendered");
        Ok(out.text)
    }
}

#[derive(Default)]
struct Source {
    text: String,
}

impl Source {
    fn raw(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// One line at `depth` levels of indentation; empty lines stay empty.
    fn line(&mut self, depth: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..depth {
                self.text.push_str(INDENT);
            }
            self.text.push_str(text);
        }
        self.text.push('\n');
    }

    /// Docblock at `depth`; an empty entry is a bare ` *` line.
    fn doc(&mut self, depth: usize, lines: &[String]) {
        self.line(depth, "/**");
        for line in lines {
            if line.is_empty() {
                self.line(depth, " *");
            } else {
                self.line(depth, &format!(" * {line}"));
            }
        }
        self.line(depth, " */");
    }
}

fn header(out: &mut Source, spec: &ModelSpec, timestamp: &str) {
    out.doc(
        0,
        &[
            spec.class_name.clone(),
            String::new(),
            format!("Model for the `{}` table.", spec.table),
            String::new(),
            format!("@autogenerated by Phalcon Developer Tools {VERSION}"),
            format!("@date {timestamp}"),
        ],
    );
}

fn property(out: &mut Source, spec: &ModelSpec, column: &Column) {
    let visibility = if spec.flags.accessors { "protected" } else { "public" };
    let mut doc = vec![String::new()];
    if spec.flags.annotate {
        if column.primary {
            doc.push("@Primary".into());
        }
        if column.auto_increment {
            doc.push("@Identity".into());
        }
        doc.push(column_annotation(column));
    } else {
        doc.push(format!("@var {}", column.kind.doc_type()));
    }

    out.line(0, "");
    out.doc(1, &doc);
    out.line(
        1,
        &format!("{visibility} ${};", spec.property_name(&column.name)),
    );
}

fn column_annotation(column: &Column) -> String {
    let mut parts = vec![
        format!("column=\"{}\"", column.name),
        format!("type=\"{}\"", column.kind.annotation_type()),
    ];
    if let Some(size) = column.size {
        parts.push(format!("length={size}"));
    }
    parts.push(format!("nullable={}", column.nullable));
    format!("@Column({})", parts.join(", "))
}

fn setter(out: &mut Source, spec: &ModelSpec, column: &Column) {
    let property = spec.property_name(&column.name);
    out.line(0, "");
    out.doc(
        1,
        &[
            format!("Method to set the value of field {property}"),
            String::new(),
            format!("@param {} ${property}", column.kind.doc_type()),
            "@return $this".into(),
        ],
    );
    out.line(1, &format!("public function set{}(${property})", camelize(&column.name)));
    out.line(1, "{");
    out.line(2, &format!("$this->{property} = ${property};"));
    out.line(0, "");
    out.line(2, "return $this;");
    out.line(1, "}");
}

fn getter(out: &mut Source, spec: &ModelSpec, column: &Column) {
    let property = spec.property_name(&column.name);
    out.line(0, "");
    out.doc(
        1,
        &[
            format!("Returns the value of field {property}"),
            String::new(),
            format!("@return {}", column.kind.doc_type()),
        ],
    );
    out.line(1, &format!("public function get{}()", camelize(&column.name)));
    out.line(1, "{");
    out.line(2, &format!("return $this->{property};"));
    out.line(1, "}");
}

fn initialize(out: &mut Source, spec: &ModelSpec) {
    out.line(0, "");
    out.doc(1, &["Initialize method for model.".into()]);
    out.line(1, "public function initialize()");
    out.line(1, "{");
    if let Some(schema) = &spec.schema {
        out.line(2, &format!("$this->setSchema(\"{schema}\");"));
    }
    out.line(2, &format!("$this->setSource(\"{}\");", spec.table));

    // hasMany declarations come first, whatever order they were inferred in.
    let ordered = spec
        .relations
        .iter()
        .filter(|r| r.kind == RelationKind::HasMany)
        .chain(spec.relations.iter().filter(|r| r.kind == RelationKind::BelongsTo));
    for relation in ordered {
        out.line(2, &relation_call(spec, relation));
    }
    out.line(1, "}");
}

fn relation_call(spec: &ModelSpec, relation: &RelationSpec) -> String {
    let model = match spec.namespace() {
        Some(namespace) => format!("{namespace}\\{}", relation.referenced_model),
        None => relation.referenced_model.clone(),
    };
    let mut options = format!("'alias' => '{}'", relation.referenced_model);
    if relation.foreign_key && relation.kind == RelationKind::BelongsTo {
        options.push_str(", 'foreignKey' => true");
    }
    format!(
        "$this->{}('{}', '{model}', '{}', [{options}]);",
        relation.kind.method(),
        relation.local_field,
        relation.remote_field,
    )
}

fn finders(out: &mut Source, spec: &ModelSpec) {
    let class = &spec.class_name;
    out.line(0, "");
    out.doc(
        1,
        &[
            "Allows to query a set of records that match the specified conditions".into(),
            String::new(),
            "@param mixed $parameters".into(),
            format!("@return {class}[]|{class}|\\Phalcon\\Mvc\\Model\\ResultSetInterface"),
        ],
    );
    out.line(1, "public static function find($parameters = null)");
    out.line(1, "{");
    out.line(2, "return parent::find($parameters);");
    out.line(1, "}");

    out.line(0, "");
    out.doc(
        1,
        &[
            "Allows to query the first record that match the specified conditions".into(),
            String::new(),
            "@param mixed $parameters".into(),
            format!("@return {class}|\\Phalcon\\Mvc\\Model\\ResultInterface"),
        ],
    );
    out.line(1, "public static function findFirst($parameters = null)");
    out.line(1, "{");
    out.line(2, "return parent::findFirst($parameters);");
    out.line(1, "}");
}

fn column_map(out: &mut Source, spec: &ModelSpec) {
    out.line(0, "");
    out.doc(
        1,
        &[
            "Independent Column Mapping.".into(),
            "Keys are the real names in the table and the values their names in the application"
                .into(),
            String::new(),
            "@return array".into(),
        ],
    );
    out.line(1, "public function columnMap()");
    out.line(1, "{");
    out.line(2, "return [");
    let entries: Vec<String> = spec
        .fields()
        .map(|c| format!("'{}' => '{}'", c.name, spec.property_name(&c.name)))
        .collect();
    let count = entries.len();
    for (i, entry) in entries.into_iter().enumerate() {
        let separator = if i + 1 < count { "," } else { "" };
        out.line(3, &format!("{entry}{separator}"));
    }
    out.line(2, "];");
    out.line(1, "}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::domain::ModelFlags;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "int(11)").primary().auto_increment(),
            Column::new("user_id", "int(11)").not_null(),
            Column::new("created_at", "datetime"),
            Column::new("secret", "varchar(64)"),
        ]
    }

    fn render(spec: ModelSpec) -> String {
        PhpModelRenderer::with_timestamp("2026-01-01, 00:00:00")
            .render(&spec)
            .unwrap()
    }

    #[test]
    fn plain_model_has_public_properties_and_source() {
        let php = render(
            ModelSpec::builder("blog_posts")
                .columns(columns())
                .exclude(vec!["secret".into()])
                .build()
                .unwrap(),
        );

        assert!(php.starts_with("<?php\n\n/**\n * BlogPosts\n"));
        assert!(php.contains("class BlogPosts extends \\Phalcon\\Mvc\\Model\n{"));
        assert!(php.contains("    public $user_id;"));
        assert!(php.contains("     * @var integer"));
        assert!(!php.contains("secret"));
        assert!(php.contains("$this->setSource(\"blog_posts\");"));
        assert!(!php.contains("setSchema"));
        assert!(!php.contains("function find("));
        assert!(!php.contains("columnMap"));
        assert!(php.ends_with("}\n"));
    }

    #[test]
    fn accessors_use_protected_camelized_properties() {
        let flags = ModelFlags {
            accessors: true,
            camelize: true,
            ..ModelFlags::default()
        };
        let php = render(
            ModelSpec::builder("posts")
                .columns(columns())
                .flags(flags)
                .build()
                .unwrap(),
        );

        assert!(php.contains("    protected $createdAt;"));
        assert!(php.contains("    public function setCreatedAt($createdAt)"));
        assert!(php.contains("        $this->createdAt = $createdAt;"));
        assert!(php.contains("    public function getUserId()"));
        assert!(php.contains("        return $this->userId;"));
    }

    #[test]
    fn annotations_replace_var_docblocks() {
        let flags = ModelFlags {
            annotate: true,
            ..ModelFlags::default()
        };
        let php = render(
            ModelSpec::builder("posts")
                .columns(columns())
                .flags(flags)
                .build()
                .unwrap(),
        );

        assert!(php.contains(" * @Primary\n     * @Identity\n"));
        assert!(php.contains(
            "@Column(column=\"id\", type=\"integer\", length=11, nullable=false)"
        ));
        assert!(php.contains(
            "@Column(column=\"created_at\", type=\"datetime\", nullable=true)"
        ));
        assert!(!php.contains("@var"));
    }

    #[test]
    fn relations_are_namespaced_and_has_many_comes_first() {
        let relations = vec![
            RelationSpec {
                kind: RelationKind::BelongsTo,
                local_field: "user_id".into(),
                remote_field: "id".into(),
                referenced_model: "Users".into(),
                foreign_key: true,
            },
            RelationSpec {
                kind: RelationKind::HasMany,
                local_field: "id".into(),
                remote_field: "post_id".into(),
                referenced_model: "Comments".into(),
                foreign_key: false,
            },
        ];
        let php = render(
            ModelSpec::builder("posts")
                .schema("shop")
                .namespace(Some("\\App\\Models".into()))
                .columns(columns())
                .relations(relations)
                .build()
                .unwrap(),
        );

        assert!(php.contains("namespace App\\Models;\n"));
        assert!(php.contains("$this->setSchema(\"shop\");"));
        let has_many = php
            .find("$this->hasMany('id', 'App\\Models\\Comments', 'post_id', ['alias' => 'Comments']);")
            .unwrap();
        let belongs_to = php
            .find("$this->belongsTo('user_id', 'App\\Models\\Users', 'id', ['alias' => 'Users', 'foreignKey' => true]);")
            .unwrap();
        assert!(has_many < belongs_to);
    }

    #[test]
    fn abstract_doc_and_column_map() {
        let flags = ModelFlags {
            abstract_class: true,
            doc: true,
            map_column: true,
            camelize: true,
            ..ModelFlags::default()
        };
        let php = render(
            ModelSpec::builder("posts")
                .columns(columns())
                .exclude(vec!["secret".into()])
                .extends(Some("\\App\\BaseModel".into()))
                .flags(flags)
                .build()
                .unwrap(),
        );

        assert!(php.contains("abstract class AbstractPosts extends \\App\\BaseModel"));
        assert!(php.contains("@return AbstractPosts[]|AbstractPosts|"));
        assert!(php.contains("public static function findFirst($parameters = null)"));
        assert!(php.contains(
            "            'user_id' => 'userId',\n            'created_at' => 'createdAt'\n        ];"
        ));
    }

    #[test]
    fn current_time_is_used_without_a_fixed_timestamp() {
        let php = PhpModelRenderer::new()
            .render(&ModelSpec::builder("users").build().unwrap())
            .unwrap();
        let year = Local::now().format("%Y").to_string();
        assert!(php.contains(&format!("@date {year}-")));
    }
}
