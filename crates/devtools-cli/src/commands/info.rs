//! `devtools info`: versions, environment, directories and URIs.

use std::path::Path;

use tracing::{debug, instrument};

use devtools_adapters::PhpProbe;
use devtools_core::{
    application::InfoService,
    domain::{DirectoryLayout, InfoReport},
};

use crate::{
    cli::InfoArgs,
    commands::{load_project_config, project_root},
    error::CliResult,
    output::OutputManager,
    settings::AppSettings,
};

#[instrument(skip_all)]
pub fn execute(args: InfoArgs, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    let root = project_root(args.directory.as_deref())?;
    let report = build_report(&root, &settings);
    output.report(&report)?;
    Ok(())
}

/// Shared with the webtools server.
pub(crate) fn build_report(root: &Path, settings: &AppSettings) -> InfoReport {
    InfoService::new(Box::new(PhpProbe::new()), layout_for(root, settings)).report()
}

/// Directories known for `root`. Outside a project only the tool's own
/// paths are filled in; a broken config is not an error here.
pub(crate) fn layout_for(root: &Path, settings: &AppSettings) -> DirectoryLayout {
    let mut layout = DirectoryLayout {
        devtools_path: std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.display().to_string())),
        templates_path: settings
            .project
            .template_path
            .as_ref()
            .map(|p| p.display().to_string()),
        ..DirectoryLayout::default()
    };

    match load_project_config(root, None) {
        Ok(config) => {
            let app = config.application;
            layout.application_path = Some(root.display().to_string());
            layout.controllers_dir = app.controllers_dir;
            layout.models_dir = app.models_dir;
            layout.migrations_dir = app.migrations_dir;
            layout.views_dir = app.views_dir;
            layout.base_uri = app.base_uri;
        }
        Err(e) => debug!(error = %e, "No application config, directories omitted"),
    }
    layout
}
