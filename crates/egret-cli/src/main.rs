//! CLI entrypoint for the Egret regular-expression checker.
//!
//! The binary delegates to [`egret_cli::run`], which loads configuration,
//! parses the command line, drives the analysis engine, and renders the
//! report.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    egret_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
