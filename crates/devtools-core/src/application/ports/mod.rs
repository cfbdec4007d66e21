//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world;
//! `devtools-adapters` implements them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by services, implemented by infrastructure
//!   - `Filesystem`, `TemplateStore`, `TemplateRenderer`: project skeletons
//!   - `SchemaIntrospector`, `ModelRenderer`: model generation
//!   - `EnvironmentProbe`: system info
//!
//! - **Driving (Input) Ports**: the CLI commands calling the services

pub mod output;

pub use output::{
    EnvironmentProbe, Filesystem, ModelRenderer, SchemaIntrospector, TemplateRenderer,
    TemplateStore,
};

#[cfg(test)]
pub use output::{MockEnvironmentProbe, MockFilesystem, MockModelRenderer, MockSchemaIntrospector};
