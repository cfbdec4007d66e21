//! Domain value objects: Adapter, Flavor, TemplateEngine, RelationKind.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Per-adapter and per-flavor facts (aliases, schema rules, skeleton layout)
//! live in `registry.rs`; this file only defines the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use crate::domain::registry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Adapter ──────────────────────────────────────────────────────────────────

/// A supported database dialect.
///
/// To add one: add a variant here, then an `AdapterDef` in `registry.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adapter {
    Mysql,
    Postgresql,
    Sqlite,
}

impl Adapter {
    pub const ALL: [Adapter; 3] = [Self::Mysql, Self::Postgresql, Self::Sqlite];

    /// Canonical name as written in application configs (`Mysql`, ...).
    pub fn as_str(&self) -> &'static str {
        self.def().name
    }

    /// Registry entry for this adapter.
    pub fn def(self) -> &'static registry::AdapterDef {
        registry::adapter_def(self)
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Adapter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::lookup_adapter(s)
            .map(|def| def.adapter)
            .ok_or_else(|| DomainError::UnsupportedAdapter {
                name: s.to_string(),
            })
    }
}

// ── Flavor ───────────────────────────────────────────────────────────────────

/// Project skeleton flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Cli,
    Micro,
    #[default]
    Simple,
    Modules,
}

impl Flavor {
    pub const ALL: [Flavor; 4] = [Self::Cli, Self::Micro, Self::Simple, Self::Modules];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Micro => "micro",
            Self::Simple => "simple",
            Self::Modules => "modules",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" => Ok(Self::Cli),
            "micro" => Ok(Self::Micro),
            "simple" => Ok(Self::Simple),
            "modules" | "multi-module" => Ok(Self::Modules),
            other => Err(DomainError::UnknownFlavor(other.to_string())),
        }
    }
}

// ── TemplateEngine ───────────────────────────────────────────────────────────

/// View engine used by generated skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngine {
    #[default]
    Phtml,
    Volt,
}

impl TemplateEngine {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phtml => "phtml",
            Self::Volt => "volt",
        }
    }

    /// Extension of view files, without the dot.
    pub const fn view_extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateEngine {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phtml" => Ok(Self::Phtml),
            "volt" => Ok(Self::Volt),
            other => Err(DomainError::UnknownTemplateEngine(other.to_string())),
        }
    }
}

// ── RelationKind ─────────────────────────────────────────────────────────────

/// Direction of an inferred ORM relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    BelongsTo,
    HasMany,
}

impl RelationKind {
    /// Method name used in the generated `initialize()` body.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasMany => "hasMany",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}
