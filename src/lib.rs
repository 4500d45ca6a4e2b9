//! Telegram Desktop repackaging library
//!
//! Resolves the latest (or a requested) Telegram Desktop release on GitHub,
//! downloads its Linux x86_64 archive, stages it under `/opt/telegram` with
//! the bundled desktop integration files and hands the tree to `fpm`.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod fetch;
pub mod package;
pub mod pipeline;
pub mod release;
pub mod stage;
pub mod tools;

pub use config::{AppProfile, BuildOptions, PackageFormat};
pub use error::PackagerError;
pub use pipeline::{PackageOutcome, Pipeline, PipelineState};
pub use tools::{SearchPathLocator, ToolLocator};
