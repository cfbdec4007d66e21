//! Flags accepted by every subcommand, flattened into [`super::Cli`].

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log more: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output (-v, -vv, -vvv)",
        long_help = "Log level written to stderr:
    (none)  warnings and errors
    -v      info, one line per step
    -vv     debug, queries and resolved paths
    -vvv    trace"
    )]
    pub verbose: u8,

    /// Only errors reach the terminal.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only"
    )]
    pub quiet: bool,

    /// No ANSI escapes; `NO_COLOR` (<https://no-color.org>) sets this too.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Plain, uncolored output"
    )]
    pub no_color: bool,

    /// Tool settings file; the per-user settings file when omitted.
    #[arg(
        long = "settings",
        global = true,
        value_name = "FILE",
        env = "DEVTOOLS_SETTINGS",
        help = "Tool settings file"
    )]
    pub settings: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "How results are printed"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Colored, with progress bars and prompts.
    Human,
    Plain,
    /// One JSON document on stdout; errors as JSON on stderr.
    Json,
}
