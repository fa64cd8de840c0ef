//! BDD step definitions for CLI behaviour.
//!
//! Scenarios in `tests/features/egret_cli.feature` drive [`crate::run_with`]
//! against a scripted engine, a fixed configuration, and in-memory streams.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::process::ExitCode;
use std::rc::Rc;
use std::str::FromStr;

use egret_config::Config;
use egret_core::{AnalysisEngine, EngineError, EngineRequest};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use crate::config::ConfigLoader;
use crate::errors::AppError;
use crate::output::NO_GROUPS_NOTICE;
use crate::{EngineFactory, IoStreams};

/// A quoted string value from a Gherkin feature file; `\n` and `\"` escapes
/// are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let opened = s.strip_prefix('"').unwrap_or(s);
        let inner = opened.strip_suffix('"').unwrap_or(opened);
        Ok(Self(inner.replace("\\n", "\n").replace("\\\"", "\"")))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

struct StaticConfigLoader {
    config: Config,
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Replays canned lines and records every request it receives.
#[derive(Clone, Default)]
struct ScriptedEngine {
    lines: Vec<String>,
    requests: Rc<RefCell<Vec<EngineRequest>>>,
}

impl AnalysisEngine for ScriptedEngine {
    fn run(&self, request: &EngineRequest) -> Result<Vec<String>, EngineError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.lines.clone())
    }
}

impl EngineFactory for ScriptedEngine {
    fn build(&self, _config: &Config) -> Box<dyn AnalysisEngine> {
        Box::new(self.clone())
    }
}

struct TestWorld {
    config: Config,
    engine: ScriptedEngine,
    stdin: String,
    workspace: TempDir,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: Option<ExitCode>,
}

impl TestWorld {
    fn run(&mut self, command: &str) {
        self.stdout.clear();
        self.stderr.clear();
        let args = self.build_args(command);
        let loader = StaticConfigLoader {
            config: self.config.clone(),
        };
        let mut stdin = Cursor::new(self.stdin.clone().into_bytes());
        let mut io = IoStreams::with_terminal_status(
            &mut stdin,
            &mut self.stdout,
            &mut self.stderr,
            true,
        );
        let exit = crate::run_with(args, &mut io, &loader, &self.engine);
        self.exit_code = Some(exit);
    }

    fn build_args(&self, command: &str) -> Vec<OsString> {
        let dir = self.workspace.path().to_string_lossy().into_owned();
        let mut args = vec![OsString::from("egret")];
        args.extend(
            command
                .split_whitespace()
                .map(|token| OsString::from(token.replace("$DIR", &dir))),
        );
        args
    }

    fn stdout_text(&self) -> String {
        String::from_utf8(self.stdout.clone()).expect("stdout utf8")
    }

    fn stderr_text(&self) -> String {
        String::from_utf8(self.stderr.clone()).expect("stderr utf8")
    }

    fn exit_code(&self) -> ExitCode {
        self.exit_code.expect("exit code recorded")
    }

    fn last_request(&self) -> EngineRequest {
        self.engine
            .requests
            .borrow()
            .last()
            .cloned()
            .expect("engine was invoked")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld {
        config: Config::default(),
        engine: ScriptedEngine::default(),
        stdin: String::new(),
        workspace: TempDir::new().expect("create workspace"),
        stdout: Vec::new(),
        stderr: Vec::new(),
        exit_code: None,
    })
}

#[given("the engine emits {lines}")]
fn given_engine_lines(world: &RefCell<TestWorld>, lines: QuotedString) {
    world
        .borrow_mut()
        .engine
        .lines
        .extend(lines.as_str().split('\n').map(str::to_owned));
}

#[given("the configured base substring is {text}")]
fn given_configured_base_substring(world: &RefCell<TestWorld>, text: QuotedString) {
    let mut state = world.borrow_mut();
    state.config = state.config.clone().with_base_substring(text.as_str());
}

#[given("the pattern file {name} contains {contents}")]
fn given_pattern_file(world: &RefCell<TestWorld>, name: QuotedString, contents: QuotedString) {
    let path = world.borrow().workspace.path().join(name.as_str());
    fs::write(path, contents.as_str()).expect("write pattern file");
}

#[given("stdin holds {text}")]
fn given_stdin(world: &RefCell<TestWorld>, text: QuotedString) {
    world.borrow_mut().stdin = text.as_str().to_owned();
}

#[when("the operator runs {command}")]
fn when_operator_runs(world: &RefCell<TestWorld>, command: QuotedString) {
    world.borrow_mut().run(command.as_str());
}

#[then("the CLI succeeds")]
fn then_succeeds(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code(), ExitCode::SUCCESS);
}

#[then("the CLI fails")]
fn then_fails(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().exit_code(), ExitCode::FAILURE);
}

#[then("stdout is {expected}")]
fn then_stdout_is(world: &RefCell<TestWorld>, expected: QuotedString) {
    assert_eq!(world.borrow().stdout_text(), expected.as_str());
}

#[then("stdout starts with {prefix}")]
fn then_stdout_starts_with(world: &RefCell<TestWorld>, prefix: QuotedString) {
    let stdout = world.borrow().stdout_text();
    assert!(
        stdout.starts_with(prefix.as_str()),
        "stdout {stdout:?} did not start with {:?}",
        prefix.as_str()
    );
}

#[then("stdout contains {snippet}")]
fn then_stdout_contains(world: &RefCell<TestWorld>, snippet: QuotedString) {
    let stdout = world.borrow().stdout_text();
    assert!(
        stdout.contains(snippet.as_str()),
        "stdout {stdout:?} did not contain {:?}",
        snippet.as_str()
    );
}

#[then("stdout notes that the pattern has no capturing groups")]
fn then_stdout_notes_no_groups(world: &RefCell<TestWorld>) {
    assert!(world.borrow().stdout_text().contains(NO_GROUPS_NOTICE));
}

#[then("stderr contains {snippet}")]
fn then_stderr_contains(world: &RefCell<TestWorld>, snippet: QuotedString) {
    let stderr = world.borrow().stderr_text();
    assert!(
        stderr.contains(snippet.as_str()),
        "stderr {stderr:?} did not contain {:?}",
        snippet.as_str()
    );
}

#[then("the engine was asked to use the base substring {text}")]
fn then_engine_base_substring(world: &RefCell<TestWorld>, text: QuotedString) {
    assert_eq!(world.borrow().last_request().base_substring, text.as_str());
}

#[then("the engine was not invoked")]
fn then_engine_not_invoked(world: &RefCell<TestWorld>) {
    assert!(world.borrow().engine.requests.borrow().is_empty());
}

#[then("the file {name} contains {snippet}")]
fn then_file_contains(world: &RefCell<TestWorld>, name: QuotedString, snippet: QuotedString) {
    let path = world.borrow().workspace.path().join(name.as_str());
    let contents = fs::read_to_string(&path).expect("read report file");
    assert!(
        contents.contains(snippet.as_str()),
        "{} did not contain {:?}: {contents:?}",
        path.display(),
        snippet.as_str()
    );
}

#[scenario(path = "tests/features/egret_cli.feature")]
fn egret_cli_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
