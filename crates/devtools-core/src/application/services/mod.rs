//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! commands: "generate models", "create a project", "report system info".

pub mod info_service;
pub mod model_service;
pub mod project_service;

pub use info_service::InfoService;
pub use model_service::{GenerationEvent, GenerationReport, ModelOptions, ModelService};
pub use project_service::ProjectService;
