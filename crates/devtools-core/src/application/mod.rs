//! Application layer for devtools.
//!
//! This layer contains:
//! - **Services**: use case orchestration (ModelService, ProjectService, InfoService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! rules of its own. Naming, relation inference, and schema policy live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    GenerationEvent, GenerationReport, InfoService, ModelOptions, ModelService, ProjectService,
};

pub use ports::{
    EnvironmentProbe, Filesystem, ModelRenderer, SchemaIntrospector, TemplateRenderer,
    TemplateStore,
};

pub use error::ApplicationError;
