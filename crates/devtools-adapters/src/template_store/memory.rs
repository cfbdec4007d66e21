//! In-memory template store, one skeleton per flavor.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, RwLock},
};

use devtools_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Flavor, Template},
    error::DevtoolsResult,
};
use tracing::{debug, instrument};

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Thread-safe store keyed by [`Flavor`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<Flavor, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the skeletons compiled into the binary.
    pub fn with_builtin() -> DevtoolsResult<Self> {
        let store = Self::new();
        for template in builtin_templates::all_templates()? {
            store.insert(template)?;
        }
        Ok(store)
    }

    /// Built-in skeletons, with `flavor` replaced by the one found under
    /// `<template_path>/project/<flavor>/`.
    #[instrument(skip(template_path), fields(template_path = %template_path.display()))]
    pub fn with_template_path(template_path: &Path, flavor: Flavor) -> DevtoolsResult<Self> {
        let store = Self::with_builtin()?;
        let template = FilesystemTemplateLoader::new(template_path).load(flavor)?;
        debug!(nodes = template.tree.len(), "custom skeleton loaded");
        store.insert(template)?;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, flavor: Flavor) -> DevtoolsResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(&flavor).cloned().ok_or_else(|| {
            ApplicationError::TemplateResolution {
                reason: format!("no skeleton for project type '{flavor}'"),
            }
            .into()
        })
    }

    fn list(&self) -> DevtoolsResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, template: Template) -> DevtoolsResult<()> {
        validator::validate_template(&template)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(template.flavor, template);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtools_core::{
        domain::{FileSpec, TemplateContent, TemplateNode, TemplateSource},
        error::DevtoolsError,
    };

    #[test]
    fn builtin_store_has_every_flavor() {
        let store = InMemoryStore::with_builtin().unwrap();
        assert_eq!(store.len(), Flavor::ALL.len());
        for flavor in Flavor::ALL {
            assert_eq!(store.get(flavor).unwrap().flavor, flavor);
        }
    }

    #[test]
    fn missing_flavor_is_a_resolution_error() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.get(Flavor::Cli),
            Err(DevtoolsError::Application(
                ApplicationError::TemplateResolution { .. }
            ))
        ));
    }

    #[test]
    fn insert_replaces_per_flavor() {
        let store = InMemoryStore::with_builtin().unwrap();
        let custom = Template::builder()
            .flavor(Flavor::Micro)
            .add_node(TemplateNode::File(FileSpec::new(
                "README.md",
                TemplateContent::Literal(TemplateSource::Static("custom")),
            )))
            .build()
            .unwrap();

        store.insert(custom).unwrap();

        assert_eq!(store.len(), Flavor::ALL.len());
        assert_eq!(store.get(Flavor::Micro).unwrap().tree.len(), 1);
    }
}
