//! Drives the analysis engine as a child process.
//!
//! [`CommandEngine`] implements [`AnalysisEngine`] by running the configured
//! executable with the request encoded as flags:
//!
//! ```text
//! <program> [engine_args...] --regex <pattern> --base-substring <text>
//!           [--check] [--debug] [--stats]
//! ```
//!
//! The engine writes its result to stdout either as a JSON array of strings,
//! which preserves entries that span several lines, or as plain text with one
//! entry per line. Whatever it writes to stderr is logged.

use std::process::{Command, Stdio};
use std::sync::Arc;

use camino::Utf8PathBuf;
use egret_config::Config;
use egret_core::{AnalysisEngine, EngineError, EngineMode, EngineRequest};
use tracing::debug;

const ENGINE_TARGET: &str = "egret_cli::engine";

/// Runs the engine executable once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: Utf8PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    /// Creates an engine adapter for `program`, passing `args` first on every
    /// invocation.
    #[must_use]
    pub const fn new(program: Utf8PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Creates the adapter described by the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.engine_program().to_path_buf(),
            config.engine_args().to_vec(),
        )
    }

    fn command(&self, request: &EngineRequest) -> Command {
        let mut command = Command::new(self.program.as_std_path());
        command
            .args(&self.args)
            .args(request_arguments(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl AnalysisEngine for CommandEngine {
    fn run(&self, request: &EngineRequest) -> Result<Vec<String>, EngineError> {
        debug!(
            target: ENGINE_TARGET,
            program = %self.program,
            mode = ?request.mode,
            "spawning analysis engine"
        );
        let output = self
            .command(request)
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.program.to_string(),
                source: Arc::new(source),
            })?;

        if !output.stderr.is_empty() {
            debug!(
                target: ENGINE_TARGET,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "analysis engine wrote to stderr"
            );
        }
        if !output.status.success() {
            return Err(EngineError::NonZeroExit {
                program: self.program.to_string(),
                status: output.status.code().unwrap_or(-1),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| EngineError::InvalidUtf8)?;
        let entries = parse_entries(&stdout);
        debug!(target: ENGINE_TARGET, entries = entries.len(), "analysis engine finished");
        Ok(entries)
    }
}

/// Encodes a request as engine flags.
pub(crate) fn request_arguments(request: &EngineRequest) -> Vec<String> {
    let mut arguments = vec![
        String::from("--regex"),
        request.pattern.clone(),
        String::from("--base-substring"),
        request.base_substring.clone(),
    ];
    if request.mode == EngineMode::Check {
        arguments.push(String::from("--check"));
    }
    if request.debug {
        arguments.push(String::from("--debug"));
    }
    if request.stats {
        arguments.push(String::from("--stats"));
    }
    arguments
}

/// Splits engine stdout into entries.
pub(crate) fn parse_entries(stdout: &str) -> Vec<String> {
    if stdout.trim_start().starts_with('[')
        && let Ok(entries) = serde_json::from_str::<Vec<String>>(stdout)
    {
        return entries;
    }
    stdout.lines().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn check_request_is_encoded_as_flags() {
        let request = EngineRequest::new("a+", EngineMode::Check)
            .with_base_substring("seed")
            .with_diagnostics(false, true);
        assert_eq!(
            request_arguments(&request),
            ["--regex", "a+", "--base-substring", "seed", "--check", "--stats"]
        );
    }

    #[test]
    fn generate_request_omits_the_check_flag() {
        let request = EngineRequest::new("a+", EngineMode::Generate).with_diagnostics(true, false);
        assert_eq!(
            request_arguments(&request),
            ["--regex", "a+", "--base-substring", "evil", "--debug"]
        );
    }

    #[rstest]
    #[case::lines("Alert\nBEGIN\n\nevil\n", &["Alert", "BEGIN", "", "evil"])]
    #[case::json_array(r#"["one\ntwo", "BEGIN", "evil"]"#, &["one\ntwo", "BEGIN", "evil"])]
    #[case::bracket_text("[abc]\nBEGIN\n", &["[abc]", "BEGIN"])]
    #[case::empty("", &[])]
    fn stdout_is_split_into_entries(#[case] stdout: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_entries(stdout), expected);
    }

    #[test]
    fn from_config_uses_the_configured_program() {
        let config = Config::default().with_engine("/opt/engine", vec![String::from("-q")]);
        let engine = CommandEngine::from_config(&config);
        assert_eq!(
            engine,
            CommandEngine::new(Utf8PathBuf::from("/opt/engine"), vec![String::from("-q")])
        );
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let engine = CommandEngine::new(
            Utf8PathBuf::from("/nonexistent/egret-engine-for-tests"),
            Vec::new(),
        );
        let error = engine
            .run(&EngineRequest::new("a", EngineMode::Generate))
            .expect_err("program does not exist");
        assert!(matches!(error, EngineError::Spawn { .. }));
    }
}
