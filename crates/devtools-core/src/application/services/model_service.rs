//! Model Service - generates one model file per table.
//!
//! Workflow per run:
//! 1. List tables (or check the requested table exists)
//! 2. Infer relations from every table's references (when requested)
//! 3. Per table: skip if the file exists and `force` is unset, otherwise
//!    describe columns, build a `ModelSpec`, render, and write
//!
//! There is no transaction: a failure mid-loop leaves earlier files written.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ModelRenderer, SchemaIntrospector},
    },
    domain::{
        DomainValidator as validator, ModelFlags, ModelSpec, ProjectConfig, RelationMap,
        RelationSpec, Table, class_name_for, infer_relations,
    },
    error::DevtoolsResult,
};

/// Resolved options for a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Schema tables are listed from.
    pub schema: String,
    /// Schema a reference must point into to produce relations.
    pub comparison_schema: String,
    pub models_dir: PathBuf,
    pub namespace: Option<String>,
    pub extends: Option<String>,
    pub excluded_fields: Vec<String>,
    pub define_relations: bool,
    pub define_foreign_keys: bool,
    pub force: bool,
    pub flags: ModelFlags,
}

impl ModelOptions {
    /// Resolve adapter, schema, and models directory from the application
    /// config. Fails before anything touches the database or the disk.
    ///
    /// `models_dir` comes from `output`, then `application.models_dir`;
    /// relative paths are joined onto `root`.
    pub fn from_config(
        config: &ProjectConfig,
        root: &Path,
        schema: Option<&str>,
        output: Option<&Path>,
    ) -> DevtoolsResult<Self> {
        let adapter = config.database.adapter()?;

        let models_dir = match output {
            Some(dir) => dir.to_path_buf(),
            None => config
                .application
                .models_dir
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .ok_or(ApplicationError::ModelsDirUnknown)?,
        };
        let models_dir = if models_dir.is_absolute() {
            models_dir
        } else {
            root.join(models_dir)
        };

        let schema = config.database.resolve_schema(schema)?;
        let comparison_schema = config.database.comparison_schema(&schema)?;
        debug!(
            %adapter,
            %schema,
            %comparison_schema,
            models_dir = %models_dir.display(),
            "Resolved model options"
        );

        Ok(Self {
            schema,
            comparison_schema,
            models_dir,
            namespace: None,
            extends: None,
            excluded_fields: Vec::new(),
            define_relations: false,
            define_foreign_keys: false,
            force: false,
            flags: ModelFlags::default(),
        })
    }

    pub fn namespace(mut self, ns: Option<String>) -> Self {
        self.namespace = ns;
        self
    }

    pub fn extends(mut self, base: Option<String>) -> Self {
        self.extends = base;
        self
    }

    pub fn exclude(mut self, fields: Vec<String>) -> Self {
        self.excluded_fields = fields;
        self
    }

    pub fn relations(mut self, relations: bool, foreign_keys: bool) -> Self {
        self.define_relations = relations;
        self.define_foreign_keys = foreign_keys;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn flags(mut self, flags: ModelFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Paths written and tables skipped by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

impl GenerationReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Progress notifications for `generate_all_with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Started { total: usize },
    Written { table: String, path: PathBuf },
    Skipped { table: String, path: PathBuf },
}

pub struct ModelService {
    introspector: Box<dyn SchemaIntrospector>,
    renderer: Box<dyn ModelRenderer>,
    filesystem: Box<dyn Filesystem>,
    options: ModelOptions,
}

impl ModelService {
    pub fn new(
        introspector: Box<dyn SchemaIntrospector>,
        renderer: Box<dyn ModelRenderer>,
        filesystem: Box<dyn Filesystem>,
        options: ModelOptions,
    ) -> Self {
        Self {
            introspector,
            renderer,
            filesystem,
            options,
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Generate the model for one table.
    ///
    /// `class_name` overrides the camelized table name (`--name`).
    #[instrument(skip(self), fields(schema = %self.options.schema))]
    pub fn generate_model(
        &mut self,
        table: &str,
        class_name: Option<&str>,
    ) -> DevtoolsResult<GenerationReport> {
        let tables = self.introspector.list_tables(&self.options.schema)?;
        if !tables.iter().any(|t| t == table) {
            return Err(ApplicationError::TableNotFound {
                table: table.to_string(),
                schema: self.options.schema.clone(),
            }
            .into());
        }

        let relations = self.relations(&tables)?;
        let class_name = class_name
            .map(str::to_string)
            .unwrap_or_else(|| class_name_for(table, self.options.flags.abstract_class));

        let mut report = GenerationReport::default();
        self.generate_one(table, class_name, &relations, &mut report, &mut |_| {})?;
        Ok(report)
    }

    pub fn generate_all(&mut self) -> DevtoolsResult<GenerationReport> {
        self.generate_all_with(&mut |_| {})
    }

    /// Generate every table in the schema, reporting progress to `observer`.
    #[instrument(skip_all, fields(schema = %self.options.schema))]
    pub fn generate_all_with(
        &mut self,
        observer: &mut dyn FnMut(&GenerationEvent),
    ) -> DevtoolsResult<GenerationReport> {
        let tables = self.introspector.list_tables(&self.options.schema)?;
        info!(count = tables.len(), "Tables listed");
        observer(&GenerationEvent::Started {
            total: tables.len(),
        });

        let relations = self.relations(&tables)?;

        let mut report = GenerationReport::default();
        for table in &tables {
            let class_name = class_name_for(table, self.options.flags.abstract_class);
            self.generate_one(table, class_name, &relations, &mut report, observer)?;
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Model generation finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn relations(&mut self, tables: &[String]) -> DevtoolsResult<RelationMap> {
        if !self.options.define_relations {
            return Ok(RelationMap::default());
        }

        let mut described = Vec::with_capacity(tables.len());
        for name in tables {
            let mut table = Table::new(name.as_str(), self.options.schema.as_str());
            table.references = self
                .introspector
                .describe_references(name, &self.options.schema)?;
            described.push(table);
        }

        let map = infer_relations(
            &described,
            &self.options.comparison_schema,
            self.options.define_foreign_keys,
        );
        debug!(relations = map.relation_count(), "Relations inferred");
        Ok(map)
    }

    fn generate_one(
        &mut self,
        table: &str,
        class_name: String,
        relations: &RelationMap,
        report: &mut GenerationReport,
        observer: &mut dyn FnMut(&GenerationEvent),
    ) -> DevtoolsResult<()> {
        let path = self.options.models_dir.join(format!("{class_name}.php"));

        if self.filesystem.exists(&path) && !self.options.force {
            info!(table, path = %path.display(), "Skipping model because it already exists");
            report.skipped.push(table.to_string());
            observer(&GenerationEvent::Skipped {
                table: table.to_string(),
                path,
            });
            return Ok(());
        }

        let spec = self.build_spec(table, class_name, relations.for_table(table))?;
        let source = self.renderer.render(&spec)?;

        self.filesystem.create_dir_all(&self.options.models_dir)?;
        self.filesystem.write_file(&path, &source)?;
        info!(table, path = %path.display(), "Model written");

        report.written.push(path.clone());
        observer(&GenerationEvent::Written {
            table: table.to_string(),
            path,
        });
        Ok(())
    }

    fn build_spec(
        &mut self,
        table: &str,
        class_name: String,
        relations: Vec<RelationSpec>,
    ) -> DevtoolsResult<ModelSpec> {
        let columns = self
            .introspector
            .describe_columns(table, &self.options.schema)?;

        let spec = ModelSpec::builder(table)
            .schema(self.options.schema.clone())
            .class_name(class_name)
            .namespace(self.options.namespace.clone())
            .extends(self.options.extends.clone())
            .exclude(self.options.excluded_fields.clone())
            .columns(columns)
            .relations(relations)
            .flags(self.options.flags)
            .build()?;
        validator::validate_model(&spec)?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockModelRenderer, MockSchemaIntrospector};
    use crate::domain::{Adapter, Column, DatabaseSettings, ForeignKeyReference, RelationKind};
    use crate::error::{DevtoolsError, ErrorCategory};
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    fn options() -> ModelOptions {
        let config = ProjectConfig {
            database: DatabaseSettings {
                adapter: "Mysql".into(),
                dbname: Some("blog".into()),
                ..DatabaseSettings::default()
            },
            ..ProjectConfig::default()
        };
        ModelOptions::from_config(
            &config,
            Path::new("/srv/blog"),
            None,
            Some(Path::new("app/models")),
        )
        .unwrap()
    }

    fn blog_introspector() -> MockSchemaIntrospector {
        let mut introspector = MockSchemaIntrospector::new();
        introspector.expect_adapter().return_const(Adapter::Mysql);
        introspector
            .expect_list_tables()
            .with(eq("blog"))
            .returning(|_| Ok(vec!["users".into(), "posts".into()]));
        introspector.expect_describe_columns().returning(|table, _| {
            let mut columns = vec![Column::new("id", "int(11)").primary().auto_increment()];
            if table == "posts" {
                columns.push(Column::new("user_id", "int(11)").not_null());
            }
            Ok(columns)
        });
        introspector.expect_describe_references().returning(|table, _| {
            if table == "posts" {
                Ok(vec![
                    ForeignKeyReference::new(
                        "fk_posts_users",
                        vec!["user_id".into()],
                        "users",
                        vec!["id".into()],
                    )
                    .in_schema("blog"),
                ])
            } else {
                Ok(vec![])
            }
        });
        introspector
    }

    fn echo_renderer(seen: Arc<Mutex<Vec<ModelSpec>>>) -> MockModelRenderer {
        let mut renderer = MockModelRenderer::new();
        renderer.expect_render().returning(move |spec| {
            seen.lock().unwrap().push(spec.clone());
            Ok(format!("class {}", spec.class_name))
        });
        renderer
    }

    #[test]
    fn from_config_resolves_relative_output_against_root() {
        let opts = options();
        assert_eq!(opts.models_dir, PathBuf::from("/srv/blog/app/models"));
        assert_eq!(opts.schema, "blog");
        assert_eq!(opts.comparison_schema, "blog");
    }

    #[test]
    fn from_config_requires_models_dir() {
        let config = ProjectConfig {
            database: DatabaseSettings {
                adapter: "Sqlite".into(),
                ..DatabaseSettings::default()
            },
            ..ProjectConfig::default()
        };
        let err = ModelOptions::from_config(&config, Path::new("/srv"), None, None).unwrap_err();
        assert!(matches!(
            err,
            DevtoolsError::Application(ApplicationError::ModelsDirUnknown)
        ));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn unsupported_adapter_fails_before_generation() {
        let config = ProjectConfig {
            database: DatabaseSettings {
                adapter: "Oracle".into(),
                ..DatabaseSettings::default()
            },
            ..ProjectConfig::default()
        };
        let err =
            ModelOptions::from_config(&config, Path::new("/srv"), None, Some(Path::new("models")))
                .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("Oracle"));
    }

    #[test]
    fn generate_all_writes_every_table_with_relations() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(2).returning(|_, _| Ok(()));

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(echo_renderer(seen.clone())),
            Box::new(fs),
            options().relations(true, true),
        );

        let mut events = Vec::new();
        let report = service.generate_all_with(&mut |e| events.push(e.clone())).unwrap();

        assert_eq!(
            report.written,
            [
                PathBuf::from("/srv/blog/app/models/Users.php"),
                PathBuf::from("/srv/blog/app/models/Posts.php")
            ]
        );
        assert!(report.skipped.is_empty());
        assert_eq!(events[0], GenerationEvent::Started { total: 2 });

        let specs = seen.lock().unwrap();
        let users = &specs[0];
        assert_eq!(users.relations.len(), 1);
        assert_eq!(users.relations[0].kind, RelationKind::HasMany);
        assert_eq!(users.relations[0].referenced_model, "Posts");
        let posts = &specs[1];
        assert_eq!(posts.relations[0].kind, RelationKind::BelongsTo);
        assert!(posts.relations[0].foreign_key);
    }

    #[test]
    fn existing_files_are_skipped_without_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().times(0);
        fs.expect_create_dir_all().times(0);

        let mut renderer = MockModelRenderer::new();
        renderer.expect_render().times(0);

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(renderer),
            Box::new(fs),
            options(),
        );
        let report = service.generate_all().unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped, ["users", "posts"]);
    }

    #[test]
    fn force_overwrites_existing_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(2).returning(|_, _| Ok(()));

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(echo_renderer(Arc::default())),
            Box::new(fs),
            options().force(true),
        );
        let report = service.generate_all().unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn relations_are_not_described_unless_requested() {
        let mut introspector = MockSchemaIntrospector::new();
        introspector
            .expect_list_tables()
            .returning(|_| Ok(vec!["users".into()]));
        introspector
            .expect_describe_columns()
            .returning(|_, _| Ok(vec![Column::new("id", "int")]));
        introspector.expect_describe_references().times(0);

        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));

        let mut service = ModelService::new(
            Box::new(introspector),
            Box::new(echo_renderer(Arc::default())),
            Box::new(fs),
            options(),
        );
        assert_eq!(service.generate_all().unwrap().written.len(), 1);
    }

    #[test]
    fn generate_model_uses_explicit_class_name() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| {
                path == Path::new("/srv/blog/app/models/Author.php") && content == "class Author"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(echo_renderer(Arc::default())),
            Box::new(fs),
            options(),
        );
        let report = service.generate_model("users", Some("Author")).unwrap();
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn generate_model_rejects_unknown_table() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().times(0);

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(MockModelRenderer::new()),
            Box::new(fs),
            options(),
        );
        let err = service.generate_model("comments", None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn failure_mid_loop_keeps_earlier_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().times(1).returning(|_, _| Ok(()));

        let mut renderer = MockModelRenderer::new();
        renderer.expect_render().returning(|spec| {
            if spec.table == "posts" {
                Err(ApplicationError::RenderingFailed {
                    reason: "boom".into(),
                }
                .into())
            } else {
                Ok(String::new())
            }
        });

        let mut service = ModelService::new(
            Box::new(blog_introspector()),
            Box::new(renderer),
            Box::new(fs),
            options(),
        );
        assert!(service.generate_all().is_err());
    }
}
