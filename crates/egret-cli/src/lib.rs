//! Command-line runtime for the Egret regular-expression checker.
//!
//! The module owns argument parsing, configuration bootstrapping, pattern
//! input, and report rendering. The runtime can be driven from the binary
//! entrypoint or from tests, where the configuration loader, the analysis
//! engine, and every IO stream can be substituted.

use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use camino::Utf8Path;
use clap::Parser;
use egret_config::Config;
use egret_core::{
    AnalysisEngine, DEFAULT_BASE_SUBSTRING, GroupSelection, RunOptions, TestSession,
};
use tracing::info;

mod cli;
mod config;
mod engine;
mod errors;
mod input;
mod output;
mod telemetry;

#[cfg(test)]
mod tests;

use cli::{CheckArgs, Cli, CliCommand, GenerateArgs, PatternArgs, TestArgs};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;
use input::{PatternSpec, resolve_pattern};
use output::{Report, ReportHeader, render_report};

pub use cli::{OutputFormat, ResolvedOutputFormat};
pub use engine::CommandEngine;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`egret_config::Config`].
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--engine-program",
    "--engine-args",
    "--base-substring",
];

const RUNTIME_TARGET: &str = "egret_cli::runtime";

/// Builds the analysis engine for a loaded configuration.
pub(crate) trait EngineFactory {
    fn build(&self, config: &Config) -> Box<dyn AnalysisEngine>;
}

/// Spawns the configured engine executable.
pub(crate) struct ProcessEngineFactory;

impl EngineFactory for ProcessEngineFactory {
    fn build(&self, config: &Config) -> Box<dyn AnalysisEngine> {
        Box::new(CommandEngine::from_config(config))
    }
}

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: BufRead, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal: io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_terminal_status(
        stdin: &'a mut R,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

impl CliCommand {
    const fn pattern_args(&self) -> &PatternArgs {
        match self {
            Self::Generate(args) => &args.pattern,
            Self::Check(args) => &args.pattern,
            Self::Test(args) => &args.pattern,
        }
    }
}

impl GenerateArgs {
    const fn group_selection(&self) -> Option<GroupSelection> {
        if self.named_groups {
            Some(GroupSelection::NamedOnly)
        } else if self.groups {
            Some(GroupSelection::All)
        } else {
            None
        }
    }
}

struct CliRunner<'r, 'io, R, W, E, L, F>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    io: &'r mut IoStreams<'io, R, W, E>,
    loader: &'r L,
    engines: &'r F,
}

impl<R, W, E, L, F> CliRunner<'_, '_, R, W, E, L, F>
where
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
    F: EngineFactory,
{
    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        match self.execute(&args) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                writeln!(self.io.stderr, "{error}").ok();
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, args: &[OsString]) -> Result<ExitCode, AppError> {
        let split = split_config_arguments(args);
        let cli = match Cli::try_parse_from(split.command_arguments(args)) {
            Ok(cli) => cli,
            Err(error) if !error.use_stderr() => {
                write!(self.io.stdout, "{error}").map_err(AppError::WriteReport)?;
                return Ok(ExitCode::SUCCESS);
            }
            Err(error) => return Err(AppError::CliUsage(error)),
        };

        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let spec = resolve_pattern(
            cli.command.pattern_args(),
            &mut *self.io.stdin,
            &mut *self.io.stderr,
        )?;
        match &cli.command {
            CliCommand::Generate(command) => self.generate(&cli, command, &config, &spec),
            CliCommand::Check(command) => self.check(&cli, command, &config, &spec),
            CliCommand::Test(command) => self.test(&cli, command, &spec),
        }
    }

    fn generate(
        &mut self,
        cli: &Cli,
        command: &GenerateArgs,
        config: &Config,
        spec: &PatternSpec,
    ) -> Result<ExitCode, AppError> {
        let options = RunOptions {
            warn: false,
            base_substring: base_substring(command.base_substring.as_deref(), config),
            debug: command.report.debug,
            stats: command.report.stats,
            groups: command.group_selection(),
        };
        let session =
            TestSession::new(spec.pattern.as_str()).with_strings(command.test_strings.iter().cloned());
        let engine = self.engines.build(config);
        let outcome =
            egret_core::generate(engine.as_ref(), session.pattern(), &options, session.strings())?;
        let report = Report::Generate {
            outcome: &outcome,
            stats: command.report.stats,
            groups: options.groups,
        };
        self.emit(spec, report, cli.output, command.report.output_file.as_deref())
    }

    fn check(
        &mut self,
        cli: &Cli,
        command: &CheckArgs,
        config: &Config,
        spec: &PatternSpec,
    ) -> Result<ExitCode, AppError> {
        let options = RunOptions {
            warn: command.warn,
            base_substring: base_substring(None, config),
            debug: command.report.debug,
            stats: command.report.stats,
            groups: None,
        };
        let engine = self.engines.build(config);
        let outcome = egret_core::check(engine.as_ref(), &spec.pattern, &options)?;
        self.emit(
            spec,
            Report::Check(&outcome),
            cli.output,
            command.report.output_file.as_deref(),
        )
    }

    fn test(
        &mut self,
        cli: &Cli,
        command: &TestArgs,
        spec: &PatternSpec,
    ) -> Result<ExitCode, AppError> {
        let outcome = egret_core::test_string(&spec.pattern, &command.candidate);
        self.emit(spec, Report::Test(&outcome), cli.output, None)
    }

    fn emit(
        &mut self,
        spec: &PatternSpec,
        report: Report<'_>,
        format: OutputFormat,
        output_file: Option<&Utf8Path>,
    ) -> Result<ExitCode, AppError> {
        let header = ReportHeader {
            pattern: &spec.pattern,
            description: spec.description.as_deref(),
        };
        // Reports written to a file default to the plain-text layout.
        let resolved = format.resolve(output_file.is_some() || self.io.stdout_is_terminal());
        let rendered = render_report(header, report, resolved)?;

        if let Some(path) = output_file {
            fs::write(path, &rendered).map_err(|source| AppError::CreateOutputFile {
                path: path.to_path_buf(),
                source,
            })?;
            info!(target: RUNTIME_TARGET, path = %path, "report written");
        } else {
            self.io
                .stdout
                .write_all(rendered.as_bytes())
                .map_err(AppError::WriteReport)?;
            self.io.stdout.flush().map_err(AppError::WriteReport)?;
        }

        if report.is_failed() {
            Ok(ExitCode::FAILURE)
        } else {
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The base substring from the command line, else the configuration, else
/// the engine default.
fn base_substring(flag: Option<&str>, config: &Config) -> String {
    flag.or_else(|| config.base_substring())
        .unwrap_or(DEFAULT_BASE_SUBSTRING)
        .to_owned()
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    run_with(args, &mut io, &OrthoConfigLoader, &ProcessEngineFactory)
}

/// Runs the CLI with a custom configuration loader and engine factory.
pub(crate) fn run_with<I, R, W, E, L, F>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
    engines: &F,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
    F: EngineFactory,
{
    CliRunner {
        io,
        loader,
        engines,
    }
    .run(args)
}
