//! Relation inference from foreign-key references.
//!
//! A single pass over the introspected tables. Every single-column reference
//! whose referenced schema equals the comparison schema yields two entries:
//!
//! - `belongsTo` on the referencing table (`local = column`,
//!   `remote = referenced column`, model = camelized referenced table)
//! - `hasMany` on the referenced table (`local = referenced column`,
//!   `remote = column`, model = camelized referencing table)
//!
//! Multi-column keys yield nothing. Entries are not deduplicated, and a
//! self-reference puts both directions on the same table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::schema::Table;
use crate::domain::naming::camelize;
use crate::domain::value_objects::RelationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationSpec {
    pub kind: RelationKind,
    pub local_field: String,
    pub remote_field: String,
    pub referenced_model: String,
    /// Emit `'foreignKey' => true` in the relation options.
    pub foreign_key: bool,
}

/// `belongsTo` and `hasMany` lists keyed by table name.
///
/// Every table passed to [`infer_relations`] has an entry in both maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationMap {
    belongs_to: BTreeMap<String, Vec<RelationSpec>>,
    has_many: BTreeMap<String, Vec<RelationSpec>>,
}

impl RelationMap {
    pub fn belongs_to(&self, table: &str) -> &[RelationSpec] {
        self.belongs_to.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_many(&self, table: &str) -> &[RelationSpec] {
        self.has_many.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    /// Both directions for one table, `hasMany` first as the generated
    /// `initialize()` declares them.
    pub fn for_table(&self, table: &str) -> Vec<RelationSpec> {
        self.has_many(table)
            .iter()
            .chain(self.belongs_to(table))
            .cloned()
            .collect()
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.belongs_to.contains_key(table) && self.has_many.contains_key(table)
    }

    pub fn relation_count(&self) -> usize {
        self.belongs_to.values().chain(self.has_many.values()).map(Vec::len).sum()
    }
}

pub fn infer_relations(
    tables: &[Table],
    comparison_schema: &str,
    define_foreign_keys: bool,
) -> RelationMap {
    let mut map = RelationMap::default();

    for table in tables {
        map.belongs_to.entry(table.name.clone()).or_default();
        map.has_many.entry(table.name.clone()).or_default();
    }

    for table in tables {
        for reference in &table.references {
            if reference.referenced_schema.as_deref() != Some(comparison_schema) {
                continue;
            }
            let Some((column, referenced_column)) = reference.single_column() else {
                continue;
            };

            map.belongs_to
                .entry(table.name.clone())
                .or_default()
                .push(RelationSpec {
                    kind: RelationKind::BelongsTo,
                    local_field: column.to_string(),
                    remote_field: referenced_column.to_string(),
                    referenced_model: camelize(&reference.referenced_table),
                    foreign_key: define_foreign_keys,
                });

            map.has_many
                .entry(reference.referenced_table.clone())
                .or_default()
                .push(RelationSpec {
                    kind: RelationKind::HasMany,
                    local_field: referenced_column.to_string(),
                    remote_field: column.to_string(),
                    referenced_model: camelize(&table.name),
                    foreign_key: false,
                });
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::schema::ForeignKeyReference;

    fn fk(
        name: &str,
        cols: &[&str],
        table: &str,
        ref_cols: &[&str],
        schema: &str,
    ) -> ForeignKeyReference {
        ForeignKeyReference::new(
            name,
            cols.iter().map(|c| c.to_string()).collect(),
            table,
            ref_cols.iter().map(|c| c.to_string()).collect(),
        )
        .in_schema(schema)
    }

    #[test]
    fn tables_without_references_get_empty_lists() {
        let tables = vec![Table::new("users", "app"), Table::new("tags", "app")];
        let map = infer_relations(&tables, "app", false);

        for name in ["users", "tags"] {
            assert!(map.contains_table(name));
            assert!(map.belongs_to(name).is_empty());
            assert!(map.has_many(name).is_empty());
        }
        assert_eq!(map.relation_count(), 0);
    }

    #[test]
    fn posts_belong_to_users_and_users_have_many_posts() {
        let tables = vec![
            Table::new("users", "app"),
            Table::new("posts", "app").with_reference(fk(
                "fk_posts_users",
                &["user_id"],
                "users",
                &["id"],
                "app",
            )),
        ];
        let map = infer_relations(&tables, "app", false);

        assert_eq!(
            map.belongs_to("posts"),
            &[RelationSpec {
                kind: RelationKind::BelongsTo,
                local_field: "user_id".into(),
                remote_field: "id".into(),
                referenced_model: "Users".into(),
                foreign_key: false,
            }]
        );
        assert_eq!(
            map.has_many("users"),
            &[RelationSpec {
                kind: RelationKind::HasMany,
                local_field: "id".into(),
                remote_field: "user_id".into(),
                referenced_model: "Posts".into(),
                foreign_key: false,
            }]
        );
        assert!(map.has_many("posts").is_empty());
        assert!(map.belongs_to("users").is_empty());
    }

    #[test]
    fn multi_column_keys_produce_nothing() {
        let tables = vec![
            Table::new("pairs", "app"),
            Table::new("edges", "app").with_reference(fk(
                "fk_edges_pairs",
                &["a", "b"],
                "pairs",
                &["a", "b"],
                "app",
            )),
        ];
        let map = infer_relations(&tables, "app", true);
        assert_eq!(map.relation_count(), 0);
    }

    #[test]
    fn self_reference_produces_both_directions_on_one_table() {
        let tables = vec![Table::new("categories", "app").with_reference(fk(
            "fk_parent",
            &["parent_id"],
            "categories",
            &["id"],
            "app",
        ))];
        let map = infer_relations(&tables, "app", false);

        assert_eq!(map.belongs_to("categories").len(), 1);
        assert_eq!(map.has_many("categories").len(), 1);
        assert_eq!(map.belongs_to("categories")[0].referenced_model, "Categories");
        assert_eq!(map.has_many("categories")[0].remote_field, "parent_id");
    }

    #[test]
    fn references_outside_comparison_schema_are_ignored() {
        let tables = vec![Table::new("posts", "app").with_reference(fk(
            "fk_other",
            &["user_id"],
            "users",
            &["id"],
            "auth",
        ))];
        let map = infer_relations(&tables, "app", false);
        assert_eq!(map.relation_count(), 0);
    }

    #[test]
    fn foreign_key_flag_only_marks_belongs_to() {
        let tables = vec![
            Table::new("users", "app"),
            Table::new("posts", "app")
                .with_reference(fk("fk", &["user_id"], "users", &["id"], "app")),
        ];
        let map = infer_relations(&tables, "app", true);
        assert!(map.belongs_to("posts")[0].foreign_key);
        assert!(!map.has_many("users")[0].foreign_key);
    }

    #[test]
    fn duplicate_references_are_kept() {
        let reference = fk("fk", &["user_id"], "users", &["id"], "app");
        let tables = vec![
            Table::new("users", "app"),
            Table::new("posts", "app")
                .with_reference(reference.clone())
                .with_reference(reference),
        ];
        let map = infer_relations(&tables, "app", false);
        assert_eq!(map.belongs_to("posts").len(), 2);
        assert_eq!(map.has_many("users").len(), 2);
    }

    #[test]
    fn for_table_lists_has_many_first() {
        let tables = vec![Table::new("nodes", "app").with_reference(fk(
            "fk",
            &["parent_id"],
            "nodes",
            &["id"],
            "app",
        ))];
        let relations = infer_relations(&tables, "app", false).for_table("nodes");
        assert_eq!(relations[0].kind, RelationKind::HasMany);
        assert_eq!(relations[1].kind, RelationKind::BelongsTo);
    }
}
