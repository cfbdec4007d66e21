//! Project Service - creates project skeletons.
//!
//! Workflow:
//! 1. Fetch the flavor's template and keep the nodes matching the options
//! 2. Render it with the project's context
//! 3. Write to the filesystem, removing the project root again on failure

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{
        DomainError, DomainValidator as validator, FsEntry, ProjectSpec, ProjectStructure,
        RenderContext,
    },
    error::DevtoolsResult,
};

pub struct ProjectService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl ProjectService {
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
        }
    }

    /// Render the skeleton without writing anything (`--dry-run`).
    #[instrument(skip_all, fields(project = %spec.name, flavor = %spec.flavor))]
    pub fn plan(&self, spec: &ProjectSpec) -> DevtoolsResult<ProjectStructure> {
        validator::validate_project(spec)?;

        let template = self.store.get(spec.flavor)?.select(spec);
        if template.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                flavor: spec.flavor.to_string(),
            }
            .into());
        }
        validator::validate_template(&template)?;

        let context = RenderContext::for_project(spec);
        let structure = self.renderer.render(&template, &context, &spec.root())?;
        validator::validate_project_structure(&structure)?;

        info!(entries = structure.entry_count(), "Skeleton rendered");
        Ok(structure)
    }

    /// Create the project at `spec.root()`.
    #[instrument(skip_all, fields(project = %spec.name, root = %spec.root().display()))]
    pub fn create(&self, spec: &ProjectSpec) -> DevtoolsResult<ProjectStructure> {
        if self.filesystem.exists(&spec.root()) {
            return Err(ApplicationError::ProjectExists { path: spec.root() }.into());
        }

        let structure = self.plan(spec)?;
        self.write_structure(&structure)?;

        info!("Project created successfully");
        Ok(structure)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn write_structure(&self, structure: &ProjectStructure) -> DevtoolsResult<()> {
        if self.filesystem.exists(structure.root()) {
            return Err(ApplicationError::ProjectExists {
                path: structure.root().to_path_buf(),
            }
            .into());
        }

        match self.write_all(structure) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(structure.root());
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> DevtoolsResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            let path = structure.root().join(entry.path());
            match entry {
                FsEntry::Directory(_) => self.filesystem.create_dir_all(&path)?,
                FsEntry::File(file) => {
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;

                    if file.permissions.executable_flag() {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(error = %e, path = %root.display(), "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}
