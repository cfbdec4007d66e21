//! devtools core - hexagonal architecture implementation
//!
//! Domain and application layers for the devtools CLI: model generation
//! from a live database schema, project skeletons, and environment reports.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           devtools-cli (CLI)            │
//! │     (commands, webtools server)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ModelService, ProjectService, Info...) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (SchemaIntrospector, ModelRenderer,     │
//! │  Filesystem, TemplateStore, ...)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   devtools-adapters (Infrastructure)    │
//! │ (introspectors, PhpModelRenderer, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Table, RelationMap, ModelSpec,         │
//! │  Template, registries)                  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devtools_core::prelude::*;
//!
//! let options = ModelOptions::from_config(&config, root, None, None)?
//!     .relations(true, false);
//! let mut service = ModelService::new(introspector, renderer, filesystem, options);
//! let report = service.generate_all()?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        GenerationEvent, GenerationReport, InfoService, ModelOptions, ModelService,
        ProjectService,
        ports::{
            EnvironmentProbe, Filesystem, ModelRenderer, SchemaIntrospector, TemplateRenderer,
            TemplateStore,
        },
    };
    pub use crate::domain::{
        Adapter, Column, DirectoryLayout, Flavor, ForeignKeyReference, InfoReport, ModelFlags,
        ModelSpec, ProjectConfig, ProjectSpec, ProjectStructure, RelationMap, RenderContext,
        Table, Template, TemplateEngine,
    };
    pub use crate::error::{DevtoolsError, DevtoolsResult, ErrorInfo};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
