pub mod common;
pub mod config;
pub mod info;
pub mod model;
pub mod project;
pub mod project_structure;
pub mod relation;
pub mod schema;
pub mod template;

pub use crate::domain::DomainError;
pub use config::ProjectConfig;
pub use model::ModelSpec;
pub use project::ProjectSpec;
pub use project_structure::ProjectStructure;
pub use relation::RelationMap;
pub use schema::Table;
pub use template::Template;
