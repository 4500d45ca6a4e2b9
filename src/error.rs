//! Error types for the packaging pipeline
//!
//! Every variant is fatal: the pipeline never retries, it logs and exits.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving, fetching, staging or packaging a release
#[derive(Error, Debug)]
pub enum PackagerError {
    #[error("Architecture {arch} unsupported by {project} project")]
    UnsupportedArchitecture { arch: String, project: String },

    #[error("utility {0} was not found in path(s) specified in $PATH")]
    ToolNotFound(String),

    #[error("expected path '{}' does not exist", .0.display())]
    MissingPath(PathBuf),

    #[error("invalid release API url '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch url '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch url '{url}', status code {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed response from '{url}': {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no matching release found for version {0}")]
    NoMatchingRelease(String),

    #[error("No precompiled binaries found for Linux x86_64 target.")]
    NoPrecompiledBinaries,

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed, exit status={status}, output='{output}'")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PackagerError {
    /// Wrap an I/O error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = PackagerError> = std::result::Result<T, E>;
