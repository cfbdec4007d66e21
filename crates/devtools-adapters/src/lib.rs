//! Infrastructure adapters for devtools.
//!
//! Implements the ports of `devtools_core::application::ports`: filesystem
//! access, skeleton stores and renderers, schema introspection per database
//! dialect, the PHP model emitter and the host probe. Application config
//! discovery (`config_scanner`, `path_resolver`) lives here too, since it is
//! all file I/O.

pub mod builtin_templates;
pub mod config_scanner;
pub mod filesystem;
pub mod introspect;
pub mod path_resolver;
pub mod renderer;
pub mod system_probe;
pub mod template_loader;
pub mod template_store;

// Re-export commonly used adapters
pub use config_scanner::{ConfigScanner, LoadedConfig};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use introspect::connect;
pub use path_resolver::PathResolver;
pub use renderer::{PhpModelRenderer, SimpleRenderer};
pub use system_probe::PhpProbe;
pub use template_loader::FilesystemTemplateLoader;
pub use template_store::InMemoryStore;
