//! # devtools
//!
//! Phalcon developer tools: project skeletons, ORM models generated from a
//! live database schema, and an environment report.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber.
//! 3. Load tool settings (defaults + file + env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the command handler.
//! 6. Turn any [`CliError`] into a message and an exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, GlobalArgs, OutputFormat},
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
    settings::AppSettings,
};

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod settings;

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, with exit code 0.
            let _ = e.print();
            return ExitCode::from(e.exit_code().clamp(0, 255) as u8);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let settings = match AppSettings::load(cli.global.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                },
                &cli.global,
            );
        }
    };

    let output = OutputManager::new(&cli.global, &settings);
    let global = cli.global.clone();

    match run(cli, settings, output) {
        Ok(()) => {
            info!("devtools completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, &global),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, settings: AppSettings, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Model(args) => commands::models::execute_one(args, settings, output),
        Commands::AllModels(args) => commands::models::execute_all(args, settings, output),
        Commands::Project(args) => commands::project::execute(args, settings, output),
        Commands::Info(args) => commands::info::execute(args, settings, output),
        Commands::Webtools(cmd) => commands::webtools::execute(cmd, settings, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, settings, output),
    }
}

/// Log the error, print it to stderr and map it to an exit code.
fn handle_error(err: CliError, global: &GlobalArgs) -> ExitCode {
    err.log();

    let verbose = global.verbose > 0;
    let msg = if global.output_format == OutputFormat::Json {
        err.format_json()
    } else if !global.no_color && std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}
