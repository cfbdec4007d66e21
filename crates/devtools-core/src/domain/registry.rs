//! Adapter and flavor registries.
//!
//! Each database adapter and each skeleton flavor is described exactly once
//! here. Parsing, schema defaults, and the relation-inference schema rule
//! are table lookups; no `match` on the adapter elsewhere decides policy.
//!
//! # Adding a New Adapter
//!
//! 1. Add a variant to `Adapter` in `value_objects.rs`
//! 2. Add one [`AdapterDef`] entry to [`ADAPTER_REGISTRY`] (same position)
//! 3. Provide an introspector in `devtools-adapters`

use crate::domain::value_objects::{Adapter, Flavor};

// ── Adapter definitions ──────────────────────────────────────────────────────

/// Which value a foreign key's referenced schema is compared against when
/// deciding whether the reference produces relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRule {
    /// Compare against `database.dbname`.
    DatabaseName,
    /// Compare against the schema the tables were listed from.
    ConnectionSchema,
}

/// Schema used when neither `--schema` nor `database.schema` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultSchema {
    DatabaseName,
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct AdapterDef {
    pub adapter: Adapter,

    /// Canonical configuration name (`database.adapter = Mysql`).
    pub name: &'static str,

    /// Accepted spellings, compared case-insensitively.
    pub aliases: &'static [&'static str],

    pub reference_schema: SchemaRule,
    pub default_schema: DefaultSchema,
    pub default_port: Option<u16>,
}

/// Ordered like `Adapter::ALL`; `registry_integrity` checks it.
pub static ADAPTER_REGISTRY: &[AdapterDef] = &[
    AdapterDef {
        adapter: Adapter::Mysql,
        name: "Mysql",
        aliases: &["mysql", "mariadb"],
        reference_schema: SchemaRule::ConnectionSchema,
        default_schema: DefaultSchema::DatabaseName,
        default_port: Some(3306),
    },
    AdapterDef {
        adapter: Adapter::Postgresql,
        name: "Postgresql",
        aliases: &["postgresql", "postgres", "pgsql", "pg"],
        // Postgres reports the catalog (database) as the referenced schema.
        reference_schema: SchemaRule::DatabaseName,
        default_schema: DefaultSchema::Fixed("public"),
        default_port: Some(5432),
    },
    AdapterDef {
        adapter: Adapter::Sqlite,
        name: "Sqlite",
        aliases: &["sqlite", "sqlite3"],
        reference_schema: SchemaRule::ConnectionSchema,
        default_schema: DefaultSchema::Fixed("main"),
        default_port: None,
    },
];

pub(crate) fn adapter_def(adapter: Adapter) -> &'static AdapterDef {
    let index = match adapter {
        Adapter::Mysql => 0,
        Adapter::Postgresql => 1,
        Adapter::Sqlite => 2,
    };
    &ADAPTER_REGISTRY[index]
}

/// Resolve a configured adapter name (`Mysql`, `pgsql`, ...).
pub fn lookup_adapter(name: &str) -> Option<&'static AdapterDef> {
    let needle = name.trim();
    ADAPTER_REGISTRY.iter().find(|def| {
        def.name.eq_ignore_ascii_case(needle)
            || def.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle))
    })
}

pub fn supported_adapter_names() -> Vec<&'static str> {
    ADAPTER_REGISTRY.iter().map(|d| d.name).collect()
}

// ── Flavor definitions ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct FlavorDef {
    pub flavor: Flavor,
    pub description: &'static str,

    /// Served over HTTP (gets `public/`, `.htaccess`, webtools).
    pub web_facing: bool,

    /// Directory holding `config.{ini,php}`, relative to the project root.
    pub config_dir: &'static str,

    /// `application.modelsDir` written into generated configs.
    pub models_dir: &'static str,
}

pub static FLAVOR_REGISTRY: &[FlavorDef] = &[
    FlavorDef {
        flavor: Flavor::Cli,
        description: "Command-line application driven by tasks",
        web_facing: false,
        config_dir: "app/config",
        models_dir: "app/models",
    },
    FlavorDef {
        flavor: Flavor::Micro,
        description: "Single-file micro application with route handlers",
        web_facing: true,
        config_dir: "app/config",
        models_dir: "app/models",
    },
    FlavorDef {
        flavor: Flavor::Simple,
        description: "Single-module MVC application",
        web_facing: true,
        config_dir: "app/config",
        models_dir: "app/models",
    },
    FlavorDef {
        flavor: Flavor::Modules,
        description: "Multi-module MVC application (frontend module)",
        web_facing: true,
        config_dir: "app/config",
        models_dir: "apps/frontend/models",
    },
];

pub fn find_flavor(flavor: Flavor) -> Option<&'static FlavorDef> {
    FLAVOR_REGISTRY.iter().find(|def| def.flavor == flavor)
}
