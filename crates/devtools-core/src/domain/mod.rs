// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for devtools.
//!
//! Pure logic only: schema and relation model, model/project specifications,
//! skeleton templates, naming rules, and the adapter/flavor registries.
//! All I/O (databases, filesystem, host probing) is reached through the
//! ports defined in the application layer.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or process calls
//! - **Registry-driven policy**: per-adapter rules live in `registry.rs`
pub mod entities;
pub mod error;
pub mod naming;
pub mod registry;
pub mod value_objects;

mod validation;

pub use entities::{
    common::{Permissions, RelativePath},
    config::{ApplicationSettings, DatabaseSettings, ProjectConfig},
    info::{DirectoryLayout, HostFacts, InfoEntry, InfoReport, InfoSection, SectionKind},
    model::{
        ABSTRACT_PREFIX, DEFAULT_BASE_CLASS, ModelFlags, ModelSpec, ModelSpecBuilder,
        class_name_for,
    },
    project::ProjectSpec,
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    relation::{RelationMap, RelationSpec, infer_relations},
    schema::{Column, ColumnKind, ForeignKeyReference, Table},
    template::{
        DirectorySpec, FileSpec, NodeCondition, RenderContext, Template, TemplateBuilder,
        TemplateContent, TemplateMetadata, TemplateNode, TemplateSource, TemplateTree,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use registry::{ADAPTER_REGISTRY, AdapterDef, FLAVOR_REGISTRY, FlavorDef, SchemaRule};
pub use validation::DomainValidator;
pub use value_objects::{Adapter, Flavor, RelationKind, TemplateEngine};
