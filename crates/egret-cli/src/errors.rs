//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use egret_core::CoreError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read pattern file {path}: {source}")]
    ReadPatternFile { path: Utf8PathBuf, source: io::Error },
    #[error("failed to read pattern from stdin: {0}")]
    ReadStdin(io::Error),
    #[error("no regular expression supplied")]
    MissingPattern,
    #[error(transparent)]
    Run(#[from] CoreError),
    #[error("failed to create output file {path}: {source}")]
    CreateOutputFile { path: Utf8PathBuf, source: io::Error },
    #[error("failed to write report: {0}")]
    WriteReport(io::Error),
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
}
