//! Renderers: skeleton templates and model source files.

mod model;
mod simple;

pub use model::PhpModelRenderer;
pub use simple::SimpleRenderer;
