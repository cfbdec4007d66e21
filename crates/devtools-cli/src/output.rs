//! Terminal output.

use std::io::{self, IsTerminal};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use devtools_core::domain::InfoReport;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::settings::AppSettings;

/// Writes command output to stdout in the resolved format.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, settings: &AppSettings) -> Self {
        // Auto becomes Human on a TTY and Plain when piped.
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || settings.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document on stdout. Only JSON mode writes; quiet does not
    /// suppress it.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        if !self.is_json() {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Sections as aligned `key: value` lines, or JSON in JSON mode.
    pub fn report(&self, report: &InfoReport) -> io::Result<()> {
        if self.is_json() {
            return self.json(report);
        }
        for section in &report.sections {
            if section.entries.is_empty() {
                continue;
            }
            self.header(section.title)?;
            let width = section
                .entries
                .iter()
                .map(|e| e.key.len())
                .max()
                .unwrap_or(0);
            for entry in &section.entries {
                self.print(&format!("  {:<width$}  {}", entry.key, entry.value))?;
            }
            self.print("")?;
        }
        Ok(())
    }

    /// A bar for `total` steps. Hidden unless output is human and not quiet.
    pub fn progress(&self, total: u64) -> ProgressBar {
        if self.resolved_format != OutputFormat::Human || self.quiet {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    fn silent(&self) -> bool {
        self.quiet || self.is_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            settings: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppSettings::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn color_only_in_human_mode() {
        assert!(!make_manager(false, false, OutputFormat::Human).no_color);
        assert!(make_manager(false, true, OutputFormat::Human).no_color);
        assert!(make_manager(false, false, OutputFormat::Plain).no_color);
    }

    #[test]
    fn json_mode_is_resolved() {
        let out = make_manager(false, false, OutputFormat::Json);
        assert!(out.is_json());
        assert_eq!(out.resolved_format, OutputFormat::Json);
    }

    #[test]
    fn progress_hidden_outside_human_mode() {
        assert!(make_manager(false, true, OutputFormat::Plain).progress(3).is_hidden());
        assert!(make_manager(true, true, OutputFormat::Human).progress(3).is_hidden());
    }
}
