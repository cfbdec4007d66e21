use crate::domain::{
    entities::{ModelSpec, ProjectSpec, ProjectStructure, Template},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Services call through here rather than reaching into entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_model(spec: &ModelSpec) -> Result<(), DomainError> {
        spec.validate()
    }

    pub fn validate_project(spec: &ProjectSpec) -> Result<(), DomainError> {
        spec.validate()
    }

    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
