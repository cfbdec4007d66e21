//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use devtools_core::domain::{Flavor, TemplateEngine};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "devtools",
    bin_name = "devtools",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Phalcon developer tools",
    long_about = "Generates project skeletons and ORM models from a live database \
                  schema, and reports on the PHP environment.",
    after_help = "EXAMPLES:\n\
        \x20 devtools project store simple --use-config-ini\n\
        \x20 devtools model users --namespace 'App\\Models' --get-set\n\
        \x20 devtools all-models --relations --fk --force\n\
        \x20 devtools webtools serve --addr 127.0.0.1:8000",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the model for one table.
    #[command(
        visible_alias = "create-model",
        about = "Generate a model for a database table",
        after_help = "EXAMPLES:\n\
            \x20 devtools model users\n\
            \x20 devtools model users --name Customer --get-set --doc\n\
            \x20 devtools model posts --relations --fk --excludefields secret,token"
    )]
    Model(ModelArgs),

    /// Generate models for every table in the schema.
    #[command(
        visible_alias = "create-all-models",
        about = "Generate models for every table",
        after_help = "EXAMPLES:\n\
            \x20 devtools all-models\n\
            \x20 devtools all-models --schema reporting --output app/reports/models\n\
            \x20 devtools all-models --relations --force"
    )]
    AllModels(AllModelsArgs),

    /// Create a project skeleton.
    #[command(
        visible_alias = "create-project",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 devtools project store\n\
            \x20 devtools project api micro /var/www --enable-webtools\n\
            \x20 devtools project shop modules --template-engine volt --use-config-ini"
    )]
    Project(ProjectArgs),

    /// Print versions, environment, directories and URIs.
    #[command(visible_alias = "i", about = "Show environment information")]
    Info(InfoArgs),

    /// Local web interface.
    #[command(subcommand, about = "Web tools")]
    Webtools(WebtoolsCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 devtools completions bash > ~/.local/share/bash-completion/completions/devtools\n\
            \x20 devtools completions zsh  > ~/.zfunc/_devtools\n\
            \x20 devtools completions fish > ~/.config/fish/completions/devtools.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the tool settings.
    #[command(
        about = "Settings management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 devtools config get project.flavor\n\
            \x20 devtools config list\n\
            \x20 devtools config init"
    )]
    Config(ConfigCommands),
}

// ── model / all-models ────────────────────────────────────────────────────────

/// Options shared by `model` and `all-models`.
#[derive(Debug, Clone, Args)]
pub struct GenerationArgs {
    /// Schema to read tables from.
    #[arg(long = "schema", value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Application config file; scanned for when omitted.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Namespace of the generated classes.
    #[arg(long = "namespace", value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Base class, `\Phalcon\Mvc\Model` by default.
    #[arg(long = "extends", value_name = "CLASS")]
    pub extends: Option<String>,

    /// Columns left out of every model.
    #[arg(long = "excludefields", value_name = "FIELDS", value_delimiter = ',')]
    pub exclude_fields: Vec<String>,

    /// Project root; the current directory by default.
    #[arg(long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Models directory, overriding `application.modelsDir`.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Protected properties with getters and setters.
    #[arg(long = "get-set")]
    pub get_set: bool,

    /// Add `find`/`findFirst` helpers for IDE completion.
    #[arg(long = "doc")]
    pub doc: bool,

    /// Overwrite existing model files.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Abstract classes named `Abstract<Model>`.
    #[arg(long = "abstract")]
    pub abstract_class: bool,

    /// camelCase property names.
    #[arg(long = "camelize")]
    pub camelize: bool,

    /// Add a `columnMap()` method.
    #[arg(long = "mapcolumn")]
    pub map_column: bool,

    /// Annotation docblocks on properties.
    #[arg(long = "annotate")]
    pub annotate: bool,

    /// Infer `belongsTo`/`hasMany` relations from foreign keys.
    #[arg(long = "relations")]
    pub relations: bool,

    /// Mark `belongsTo` relations as foreign keys.
    #[arg(long = "fk", requires = "relations")]
    pub foreign_keys: bool,
}

/// Arguments for `devtools model`.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Table to generate the model for.
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Class name, the camelized table name by default.
    #[arg(long = "name", value_name = "CLASS")]
    pub name: Option<String>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for `devtools all-models`.
#[derive(Debug, Args)]
pub struct AllModelsArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,
}

// ── project ───────────────────────────────────────────────────────────────────

/// Arguments for `devtools project`.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project name; also the directory created.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Project type; the `project.flavor` setting by default.
    #[arg(value_name = "TYPE", value_enum)]
    pub flavor: Option<FlavorArg>,

    /// Parent directory; the current directory by default.
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Add the webtools entry point to `public/`.
    #[arg(long = "enable-webtools")]
    pub enable_webtools: bool,

    /// Directory with `project/<type>/` skeletons.
    #[arg(long = "template-path", value_name = "DIR")]
    pub template_path: Option<PathBuf>,

    /// View engine.
    #[arg(long = "template-engine", value_enum, value_name = "ENGINE")]
    pub template_engine: Option<EngineArg>,

    /// `config.ini` instead of `config.php`.
    #[arg(long = "use-config-ini")]
    pub use_config_ini: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// List what would be created without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Project types accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlavorArg {
    Cli,
    Micro,
    Simple,
    #[value(alias = "multi-module")]
    Modules,
}

impl From<FlavorArg> for Flavor {
    fn from(arg: FlavorArg) -> Self {
        match arg {
            FlavorArg::Cli => Flavor::Cli,
            FlavorArg::Micro => Flavor::Micro,
            FlavorArg::Simple => Flavor::Simple,
            FlavorArg::Modules => Flavor::Modules,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Phtml,
    Volt,
}

impl From<EngineArg> for TemplateEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Phtml => TemplateEngine::Phtml,
            EngineArg::Volt => TemplateEngine::Volt,
        }
    }
}

// ── info / webtools ───────────────────────────────────────────────────────────

/// Arguments for `devtools info`.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Project root; the current directory by default.
    #[arg(long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

/// Subcommands for `devtools webtools`.
#[derive(Debug, Subcommand)]
pub enum WebtoolsCommands {
    /// Serve the environment report over HTTP until Ctrl-C.
    Serve {
        /// Listen address; the `webtools.addr` setting by default.
        #[arg(long = "addr", value_name = "HOST:PORT")]
        addr: Option<String>,

        /// Project root; the current directory by default.
        #[arg(long = "directory", value_name = "DIR")]
        directory: Option<PathBuf>,
    },
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `devtools completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `devtools config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a settings key.
    Get {
        /// Dotted key path, e.g. `project.flavor`.
        key: String,
    },
    /// Print all settings.
    List,
    /// Print the path to the active settings file.
    Path,
    /// Write the default settings file.
    Init {
        /// Overwrite an existing settings file.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
