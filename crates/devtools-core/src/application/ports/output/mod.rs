//! Driven (output) ports - implemented by infrastructure.
//!
//! The `devtools-adapters` crate provides implementations.

use crate::domain::{
    Adapter, Column, Flavor, ForeignKeyReference, HostFacts, ModelSpec, ProjectStructure,
    RenderContext, Template,
};
use crate::error::DevtoolsResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `devtools_adapters::filesystem::LocalFilesystem` (production)
/// - `devtools_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> DevtoolsResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> DevtoolsResult<()>;

    fn set_permissions(&self, path: &Path, executable: bool) -> DevtoolsResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> DevtoolsResult<()>;
}

/// Port for skeleton templates, one per flavor.
///
/// Implemented by `devtools_adapters::template_store::InMemoryStore`, seeded
/// from the built-in skeletons or from a `--template-path` directory.
pub trait TemplateStore: Send + Sync {
    fn get(&self, flavor: Flavor) -> DevtoolsResult<Template>;

    fn list(&self) -> DevtoolsResult<Vec<Template>>;

    /// Insert or replace the template for its flavor.
    fn insert(&self, template: Template) -> DevtoolsResult<()>;
}

/// Port for skeleton rendering.
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` into a structure rooted at `output_root`.
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> DevtoolsResult<ProjectStructure>;
}

/// Port for reading a database schema.
///
/// One implementation per dialect in `devtools_adapters::introspect`.
/// Methods take `&mut self` because the underlying clients do.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaIntrospector: Send {
    fn adapter(&self) -> Adapter;

    /// Base table names in `schema`, in the order the server reports them.
    fn list_tables(&mut self, schema: &str) -> DevtoolsResult<Vec<String>>;

    fn describe_columns(&mut self, table: &str, schema: &str) -> DevtoolsResult<Vec<Column>>;

    fn describe_references(
        &mut self,
        table: &str,
        schema: &str,
    ) -> DevtoolsResult<Vec<ForeignKeyReference>>;
}

/// Port for emitting model source text.
#[cfg_attr(test, mockall::automock)]
pub trait ModelRenderer: Send + Sync {
    fn render(&self, spec: &ModelSpec) -> DevtoolsResult<String>;
}

/// Port for discovering facts about the host runtime.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentProbe: Send + Sync {
    fn probe(&self) -> HostFacts;
}
