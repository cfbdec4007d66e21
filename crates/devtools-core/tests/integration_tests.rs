//! Integration tests for devtools-core's public API.

use devtools_core::domain::{
    DatabaseSettings, ForeignKeyReference, ModelFlags, ModelSpec, ProjectConfig, RelationKind,
    Table, infer_relations,
};

fn settings(adapter: &str) -> DatabaseSettings {
    DatabaseSettings {
        adapter: adapter.into(),
        dbname: Some("blog".into()),
        ..DatabaseSettings::default()
    }
}

fn blog_tables(referenced_schema: &str) -> Vec<Table> {
    vec![
        Table::new("users", "public"),
        Table::new("posts", "public").with_reference(
            ForeignKeyReference::new(
                "posts_user_id_fkey",
                vec!["user_id".into()],
                "users",
                vec!["id".into()],
            )
            .in_schema(referenced_schema),
        ),
    ]
}

#[test]
fn postgres_policy_matches_references_reported_under_dbname() {
    let db = settings("Postgresql");
    let schema = db.resolve_schema(None).unwrap();
    assert_eq!(schema, "public");

    let comparison = db.comparison_schema(&schema).unwrap();
    let map = infer_relations(&blog_tables("blog"), &comparison, false);
    assert_eq!(map.belongs_to("posts").len(), 1);
    assert_eq!(map.has_many("users").len(), 1);

    // The same references compared against the connection schema find nothing.
    let map = infer_relations(&blog_tables("blog"), &schema, false);
    assert_eq!(map.relation_count(), 0);
}

#[test]
fn mysql_policy_compares_against_connection_schema() {
    let db = settings("Mysql");
    let schema = db.resolve_schema(None).unwrap();
    let comparison = db.comparison_schema(&schema).unwrap();

    let map = infer_relations(&blog_tables("blog"), &comparison, true);
    let belongs = &map.belongs_to("posts")[0];
    assert_eq!(belongs.kind, RelationKind::BelongsTo);
    assert_eq!(belongs.referenced_model, "Users");
    assert!(belongs.foreign_key);
}

#[test]
fn relations_flow_into_model_spec() {
    let map = infer_relations(&blog_tables("public"), "public", false);
    let spec = ModelSpec::builder("users")
        .relations(map.for_table("users"))
        .flags(ModelFlags {
            accessors: true,
            ..ModelFlags::default()
        })
        .build()
        .unwrap();

    assert_eq!(spec.class_name, "Users");
    assert_eq!(spec.relations.len(), 1);
    assert_eq!(spec.relations[0].kind, RelationKind::HasMany);
    assert_eq!(spec.relations[0].local_field, "id");
    assert_eq!(spec.relations[0].remote_field, "user_id");
}

#[test]
fn project_config_defaults_are_empty() {
    let config = ProjectConfig::default();
    assert!(config.application.models_dir.is_none());
    assert!(config.database.adapter().is_err());
}
