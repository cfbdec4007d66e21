//! `devtools model` and `devtools all-models`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use devtools_adapters::{LocalFilesystem, PhpModelRenderer, connect};
use devtools_core::{
    application::{GenerationEvent, GenerationReport, ModelOptions, ModelService},
    domain::ModelFlags,
};

use crate::{
    cli::{AllModelsArgs, GenerationArgs, ModelArgs},
    commands::{load_project_config, project_root},
    error::CliResult,
    output::OutputManager,
    settings::AppSettings,
};

#[derive(Serialize)]
struct Summary<'a> {
    models_dir: &'a Path,
    written: &'a [PathBuf],
    skipped: &'a [String],
}

#[instrument(skip_all, fields(table = %args.table))]
pub fn execute_one(args: ModelArgs, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    let mut service = build_service(&args.generation, &settings)?;
    let report = service.generate_model(&args.table, args.name.as_deref())?;
    print_report(&report, service.options(), &output)
}

#[instrument(skip_all)]
pub fn execute_all(
    args: AllModelsArgs,
    settings: AppSettings,
    output: OutputManager,
) -> CliResult<()> {
    let mut service = build_service(&args.generation, &settings)?;

    let bar = output.progress(0);
    let report = service.generate_all_with(&mut |event: &GenerationEvent| match event {
        GenerationEvent::Started { total } => bar.set_length(*total as u64),
        GenerationEvent::Written { table, .. } | GenerationEvent::Skipped { table, .. } => {
            bar.set_message(table.clone());
            bar.inc(1);
        }
    });
    bar.finish_and_clear();

    let report = report?;
    print_report(&report, service.options(), &output)?;
    if report.total() == 0 {
        output.warning(&format!(
            "No tables found in schema '{}'",
            service.options().schema
        ))?;
    }
    Ok(())
}

/// Config, options and database connection, in that order, so a bad config
/// or an unknown adapter fails before anything is written.
fn build_service(args: &GenerationArgs, settings: &AppSettings) -> CliResult<ModelService> {
    let root = project_root(args.directory.as_deref())?;
    let config = load_project_config(&root, args.config.as_deref())?;

    let options = ModelOptions::from_config(
        &config,
        &root,
        args.schema.as_deref(),
        args.output.as_deref(),
    )?
    .namespace(args.namespace.clone().or_else(|| settings.model.namespace.clone()))
    .extends(args.extends.clone().or_else(|| settings.model.extends.clone()))
    .exclude(args.exclude_fields.clone())
    .relations(args.relations, args.foreign_keys)
    .force(args.force)
    .flags(flags_from(args));

    let introspector = connect(&config.database, &root)?;
    info!(schema = %options.schema, models_dir = %options.models_dir.display(), "Connected");

    Ok(ModelService::new(
        introspector,
        Box::new(PhpModelRenderer::new()),
        Box::new(LocalFilesystem::new()),
        options,
    ))
}

fn flags_from(args: &GenerationArgs) -> ModelFlags {
    ModelFlags {
        accessors: args.get_set,
        doc: args.doc,
        annotate: args.annotate,
        camelize: args.camelize,
        map_column: args.map_column,
        abstract_class: args.abstract_class,
    }
}

fn print_report(
    report: &GenerationReport,
    options: &ModelOptions,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        output.json(&Summary {
            models_dir: &options.models_dir,
            written: &report.written,
            skipped: &report.skipped,
        })?;
        return Ok(());
    }

    for path in &report.written {
        output.success(&format!("Model written to {}", path.display()))?;
    }
    for table in &report.skipped {
        output.warning(&format!(
            "Model for table '{table}' already exists, skipped (use --force to overwrite)"
        ))?;
    }
    Ok(())
}
