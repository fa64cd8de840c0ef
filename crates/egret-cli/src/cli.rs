//! CLI argument definitions for the `egret` binary.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format selection for reports.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render the plain-text report.
    Human,
    /// Always emit a JSON document.
    Json,
}

/// Command-line interface for the Egret checker.
#[derive(Parser, Debug)]
#[command(name = "egret", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how the report is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto, global = true)]
    pub(crate) output: OutputFormat,
    /// The action to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Actions supported by the binary.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Generates test strings and sorts them into matches and non-matches.
    Generate(GenerateArgs),
    /// Checks a pattern and prints the validated alert report.
    Check(CheckArgs),
    /// Tests one string against a pattern.
    Test(TestArgs),
}

/// Where the pattern comes from; with neither flag it is read from stdin.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PatternArgs {
    /// The regular expression to analyse.
    #[arg(short = 'r', long, conflicts_with = "file")]
    pub(crate) regex: Option<String>,
    /// File whose first line is the pattern and whose optional second line
    /// is a description.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub(crate) file: Option<Utf8PathBuf>,
}

/// Flags shared by the engine-driven commands.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ReportArgs {
    /// Writes the report to a file instead of stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub(crate) output_file: Option<Utf8PathBuf>,
    /// Asks the engine for debugging output.
    #[arg(short = 'd', long)]
    pub(crate) debug: bool,
    /// Asks for match statistics.
    #[arg(short = 's', long)]
    pub(crate) stats: bool,
}

/// Arguments of `egret generate`.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    pub(crate) pattern: PatternArgs,
    #[command(flatten)]
    pub(crate) report: ReportArgs,
    /// Seed substring for generated strings.
    #[arg(short = 'b', long, value_name = "TEXT")]
    pub(crate) base_substring: Option<String>,
    /// Shows the capture groups of every match.
    #[arg(short = 'g', long)]
    pub(crate) groups: bool,
    /// Shows only named capture groups.
    #[arg(short = 'n', long)]
    pub(crate) named_groups: bool,
    /// Adds a string of your own to the classification; repeatable.
    #[arg(short = 't', long = "test-string", value_name = "TEXT")]
    pub(crate) test_strings: Vec<String>,
}

/// Arguments of `egret check`.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) pattern: PatternArgs,
    #[command(flatten)]
    pub(crate) report: ReportArgs,
    /// Keeps examples and fixes that fail validation, with a notice.
    #[arg(short = 'w', long)]
    pub(crate) warn: bool,
}

/// Arguments of `egret test`.
#[derive(Args, Debug, Clone)]
pub(crate) struct TestArgs {
    #[command(flatten)]
    pub(crate) pattern: PatternArgs,
    /// The string to test.
    #[arg(value_name = "STRING")]
    pub(crate) candidate: String,
}

impl OutputFormat {
    /// Resolves `auto` based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

/// Output format after resolving `auto`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Plain-text report.
    Human,
    /// JSON document.
    Json,
}
