//! `{{VARIABLE}}` substitution renderer for project skeletons.

use std::path::Path;

use devtools_core::{
    application::ports::TemplateRenderer,
    domain::{
        DomainValidator as validator, ProjectStructure, RenderContext, Template, TemplateContent,
        TemplateNode,
    },
    error::DevtoolsResult,
};
use tracing::{instrument, trace};

/// Renders every node of an already-selected template; literal files are
/// copied verbatim, parameterized files go through [`RenderContext::render`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(flavor = %template.flavor, root = %output_root.display()))]
    fn render(
        &self,
        template: &Template,
        context: &RenderContext,
        output_root: &Path,
    ) -> DevtoolsResult<ProjectStructure> {
        validator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);
        for node in &template.tree.nodes {
            match node {
                TemplateNode::Directory(dir) => structure.add_directory(dir.path.as_path()),
                TemplateNode::File(file) => {
                    let content = match &file.content {
                        TemplateContent::Literal(source) => source.as_str().to_string(),
                        TemplateContent::Parameterized(source) => context.render(source.as_str()),
                    };
                    trace!(path = %file.path, "rendered");
                    structure.add_file(file.path.as_path(), content, file.permissions);
                }
            }
        }

        validator::validate_project_structure(&structure)?;
        Ok(structure)
    }
}
