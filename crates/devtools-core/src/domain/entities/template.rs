//! Skeleton templates and rendering context.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Template (Aggregate Root, one per Flavor)                  │
//! │  ├── TemplateMetadata - human-readable info                 │
//! │  └── TemplateTree - what to create                          │
//! │       └── Vec<TemplateNode>                                 │
//! │            ├── FileSpec (path, content, condition)          │
//! │            └── DirectorySpec (path, condition)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  NodeCondition - which project options keep a node          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RenderContext                                              │
//! │  └── Variable substitution: {{PROJECT_NAME}} -> "store"     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A skeleton contains every optional file (both `config.ini` and
//! `config.php`, both `.phtml` and `.volt` views, webtools entry points).
//! [`Template::select`] keeps the nodes whose condition matches the
//! [`ProjectSpec`] before rendering.

use chrono::Datelike;
use std::collections::{HashMap, HashSet};

use crate::domain::{
    entities::common::{Permissions, RelativePath},
    entities::project::ProjectSpec,
    error::DomainError,
    naming::{to_kebab_case, to_pascal_case, to_snake_case},
    value_objects::{Flavor, TemplateEngine},
};

// ============================================================================
// Render Context
// ============================================================================

/// Variables substituted into parameterized files.
///
/// Standard variables: `PROJECT_NAME`, `PROJECT_NAME_SNAKE`,
/// `PROJECT_NAME_KEBAB`, `PROJECT_NAME_PASCAL`, `YEAR`. [`RenderContext::for_project`]
/// adds `VIEW_EXT`, `CONFIG_FILE`, `FLAVOR` and `MODELS_DIR`.
///
/// Unknown placeholders are left untouched, so Volt's `{{ content() }}`
/// survives rendering.
#[derive(Debug, Clone)]
pub struct RenderContext {
    project_name: String,
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: impl Into<String>) -> Self {
        let name = project_name.into();
        let mut vars = HashMap::new();

        vars.insert("PROJECT_NAME".to_string(), name.clone());
        vars.insert("PROJECT_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("PROJECT_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("PROJECT_NAME_PASCAL".to_string(), to_pascal_case(&name));
        vars.insert("YEAR".to_string(), chrono::Local::now().year().to_string());

        Self {
            project_name: name,
            variables: vars,
        }
    }

    pub fn for_project(spec: &ProjectSpec) -> Self {
        let models_dir = crate::domain::registry::find_flavor(spec.flavor)
            .map(|def| def.models_dir)
            .unwrap_or("app/models");

        Self::new(&spec.name)
            .with_variable("VIEW_EXT", spec.engine.view_extension())
            .with_variable("CONFIG_FILE", spec.config_file())
            .with_variable("FLAVOR", spec.flavor.as_str())
            .with_variable("MODELS_DIR", models_dir)
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Replace every `{{KEY}}` with its value.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

// ============================================================================
// Template Aggregate
// ============================================================================

#[derive(Debug, Clone)]
pub struct Template {
    pub flavor: Flavor,
    pub metadata: TemplateMetadata,
    pub tree: TemplateTree,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.metadata.name.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Metadata name cannot be empty".into(),
            ));
        }

        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                flavor: self.flavor.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for node in &self.tree.nodes {
            let path = node.path().as_str();
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicatePath { path });
            }
        }

        Ok(())
    }

    /// Copy of this template holding only the nodes that apply to `spec`.
    pub fn select(&self, spec: &ProjectSpec) -> Template {
        let nodes = self
            .tree
            .nodes
            .iter()
            .filter(|node| node.condition().applies_to(spec))
            .cloned()
            .collect();

        Template {
            flavor: self.flavor,
            metadata: self.metadata.clone(),
            tree: TemplateTree { nodes },
        }
    }
}

#[derive(Debug, Default)]
pub struct TemplateBuilder {
    flavor: Option<Flavor>,
    metadata: Option<TemplateMetadata>,
    tree: TemplateTree,
}

impl TemplateBuilder {
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    pub fn build(self) -> Result<Template, DomainError> {
        let flavor = self
            .flavor
            .ok_or(DomainError::MissingRequiredField { field: "flavor" })?;
        let template = Template {
            flavor,
            metadata: self
                .metadata
                .unwrap_or_else(|| TemplateMetadata::new(flavor.as_str())),
            tree: self.tree,
        };
        template.validate()?;
        Ok(template)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "0.1.0".to_string(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }
}

// ============================================================================
// Template Tree
// ============================================================================

/// Ordered filesystem nodes; directories should precede their files.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn with_node(mut self, node: TemplateNode) -> Self {
        self.push(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }

    pub fn condition(&self) -> NodeCondition {
        match self {
            Self::File(f) => f.condition,
            Self::Directory(d) => d.condition,
        }
    }
}

/// Project option a node depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCondition {
    Always,
    ConfigIni,
    ConfigPhp,
    Engine(TemplateEngine),
    Webtools,
}

impl NodeCondition {
    /// Derive the condition from a skeleton path:
    /// `config.ini`/`config.php` by name, views by extension, and anything
    /// named `webtools*`.
    pub fn infer(path: &RelativePath) -> Self {
        match (path.file_name(), path.extension()) {
            (Some("config.ini"), _) => Self::ConfigIni,
            (Some("config.php"), _) => Self::ConfigPhp,
            (_, Some("volt")) => Self::Engine(TemplateEngine::Volt),
            (_, Some("phtml")) => Self::Engine(TemplateEngine::Phtml),
            (Some(name), _) if name.starts_with("webtools") => Self::Webtools,
            _ => Self::Always,
        }
    }

    pub fn applies_to(&self, spec: &ProjectSpec) -> bool {
        match self {
            Self::Always => true,
            Self::ConfigIni => spec.use_config_ini,
            Self::ConfigPhp => !spec.use_config_ini,
            Self::Engine(engine) => spec.engine == *engine,
            Self::Webtools => spec.enable_webtools,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
    pub condition: NodeCondition,
}

impl FileSpec {
    /// Read-write file whose condition is inferred from its path.
    pub fn new(path: impl Into<RelativePath>, content: TemplateContent) -> Self {
        let path = path.into();
        Self {
            condition: NodeCondition::infer(&path),
            path,
            content,
            permissions: Permissions::read_write(),
        }
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }

    pub fn when(mut self, condition: NodeCondition) -> Self {
        self.condition = condition;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
    pub condition: NodeCondition,
}

impl DirectorySpec {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self {
            path: path.into(),
            condition: NodeCondition::Always,
        }
    }
}

// ============================================================================
// Content Types
// ============================================================================

#[derive(Debug, Clone)]
pub enum TemplateContent {
    /// Copied as-is.
    Literal(TemplateSource),

    /// `{{VARIABLE}}` placeholders substituted from the [`RenderContext`].
    Parameterized(TemplateSource),
}

#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Built into the binary.
    Static(&'static str),

    /// Loaded from a template path.
    Owned(String),
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Quick heuristic used by loaders when no manifest entry decides.
    pub fn contains_placeholder(&self) -> bool {
        self.as_str().contains("{{") && self.as_str().contains("}}")
    }
}
