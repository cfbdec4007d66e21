//! `devtools project`: create a project skeleton.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use devtools_adapters::{InMemoryStore, LocalFilesystem, SimpleRenderer};
use devtools_core::{
    application::ProjectService,
    domain::{Flavor, ProjectSpec, ProjectStructure, TemplateEngine},
};

use crate::{
    cli::ProjectArgs,
    commands::project_root,
    error::{CliError, CliResult},
    output::OutputManager,
    settings::AppSettings,
};

#[derive(Serialize)]
struct Created<'a> {
    root: &'a std::path::Path,
    dry_run: bool,
    files: Vec<&'a std::path::Path>,
}

/// 1. Merge arguments over settings into a `ProjectSpec`
/// 2. `--dry-run`: render and list, write nothing
/// 3. Confirm unless `--yes`, `--quiet`, JSON output or no terminal
/// 4. Create and print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: ProjectArgs,
    settings: AppSettings,
    output: OutputManager,
) -> CliResult<()> {
    let spec = build_spec(&args, &settings)?;
    debug!(?spec, "Project spec resolved");

    let store = match &spec.template_path {
        Some(path) => InMemoryStore::with_template_path(path, spec.flavor)?,
        None => InMemoryStore::with_builtin()?,
    };
    let service = ProjectService::new(
        Box::new(store),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    if args.dry_run {
        let structure = service.plan(&spec)?;
        return print_structure(&structure, true, &output);
    }

    let interactive = !args.yes
        && !output.is_quiet()
        && !output.is_json()
        && std::io::stdin().is_terminal();
    if interactive {
        show_configuration(&spec, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    output.header(&format!("Creating '{}'...", spec.name))?;
    let structure = service.create(&spec)?;
    info!(root = %structure.root().display(), "Project created");

    print_structure(&structure, false, &output)?;
    output.success(&format!("Project '{}' was successfully created.", spec.name))?;
    if spec.enable_webtools {
        output.info("Webtools entry point written to public/webtools.php")?;
    }
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", structure.root().display()))?;
    if spec.flavor == Flavor::Cli {
        output.print("  php app/bootstrap.php")?;
    } else {
        output.print("  php -S localhost:8000 -t public .htrouter.php")?;
    }
    Ok(())
}

fn build_spec(args: &ProjectArgs, settings: &AppSettings) -> CliResult<ProjectSpec> {
    let defaults = &settings.project;
    let flavor = args.flavor.map(Flavor::from).unwrap_or(defaults.flavor);
    let engine = args
        .template_engine
        .map(TemplateEngine::from)
        .unwrap_or(defaults.template_engine);
    let directory: PathBuf = project_root(args.directory.as_deref())?;

    Ok(ProjectSpec::new(args.name.trim(), flavor, directory)
        .with_engine(engine)
        .with_webtools(args.enable_webtools || defaults.enable_webtools)
        .with_config_ini(args.use_config_ini || defaults.use_config_ini)
        .with_template_path(
            args.template_path
                .clone()
                .or_else(|| defaults.template_path.clone()),
        ))
}

fn print_structure(
    structure: &ProjectStructure,
    dry_run: bool,
    output: &OutputManager,
) -> CliResult<()> {
    let mut files: Vec<_> = structure.files().map(|f| f.path.as_path()).collect();
    files.sort();

    if output.is_json() {
        output.json(&Created {
            root: structure.root(),
            dry_run,
            files,
        })?;
        return Ok(());
    }

    if dry_run {
        output.info(&format!(
            "Dry run: would create {} files at {}",
            files.len(),
            structure.root().display()
        ))?;
    }
    for file in files {
        output.print(&format!("  {}", file.display()))?;
    }
    Ok(())
}

fn show_configuration(spec: &ProjectSpec, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", spec.name))?;
    out.print(&format!("  Type:      {}", spec.flavor))?;
    out.print(&format!("  Views:     {}", spec.engine))?;
    out.print(&format!("  Config:    {}", spec.config_file()))?;
    out.print(&format!("  Webtools:  {}", if spec.enable_webtools { "yes" } else { "no" }))?;
    out.print(&format!("  Location:  {}", spec.root().display()))?;
    out.print("")?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn project_args(argv: &[&str]) -> ProjectArgs {
        let mut full = vec!["devtools", "project"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Project(args) => args,
            other => panic!("expected Project command, got {other:?}"),
        }
    }

    #[test]
    fn arguments_win_over_settings() {
        let mut settings = AppSettings::default();
        settings.project.flavor = Flavor::Micro;
        settings.project.template_engine = TemplateEngine::Volt;

        let spec = build_spec(
            &project_args(&["store", "cli", "/srv", "--template-engine", "phtml"]),
            &settings,
        )
        .unwrap();
        assert_eq!(spec.flavor, Flavor::Cli);
        assert_eq!(spec.engine, TemplateEngine::Phtml);
        assert_eq!(spec.root(), PathBuf::from("/srv/store"));
    }

    #[test]
    fn settings_fill_in_omitted_options() {
        let mut settings = AppSettings::default();
        settings.project.flavor = Flavor::Modules;
        settings.project.use_config_ini = true;
        settings.project.template_path = Some(PathBuf::from("/opt/skeletons"));

        let spec = build_spec(&project_args(&["shop", "--dry-run"]), &settings).unwrap();
        assert_eq!(spec.flavor, Flavor::Modules);
        assert_eq!(spec.config_file(), "config.ini");
        assert_eq!(spec.template_path, Some(PathBuf::from("/opt/skeletons")));
        assert!(!spec.enable_webtools);
    }
}
