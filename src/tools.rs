//! External tool discovery
//!
//! Tools are looked up once per run. A missing tool is a precondition
//! failure; the pipeline never starts without all of them.

use std::ffi::OsString;
use std::path::PathBuf;

use log::debug;

use crate::error::{PackagerError, Result};

/// Download utility
pub const WGET: &str = "wget";
/// Archive utility
pub const TAR: &str = "tar";
/// Package builder
pub const FPM: &str = "fpm";

/// An executable resolved on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub name: String,
    pub path: PathBuf,
}

/// Capability to turn a tool name into a validated executable
pub trait ToolLocator: Send + Sync {
    fn locate(&self, name: &str) -> Result<ExternalTool>;
}

/// Locates tools on `$PATH`, or on an explicit search path
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
    search_path: Option<OsString>,
}

impl SearchPathLocator {
    /// Search the process's `$PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Search only the given `PATH`-style list of directories
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolLocator for SearchPathLocator {
    fn locate(&self, name: &str) -> Result<ExternalTool> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir()
                    .map_err(|e| PackagerError::io("failed to read current directory", e))?;
                which::which_in(name, Some(paths), cwd)
            }
            None => which::which(name),
        };

        let path = found.map_err(|_| PackagerError::ToolNotFound(name.to_string()))?;
        debug!("found {} at '{}'", name, path.display());

        Ok(ExternalTool {
            name: name.to_string(),
            path,
        })
    }
}

/// The three utilities one run needs
#[derive(Debug, Clone)]
pub struct Toolset {
    pub wget: ExternalTool,
    pub tar: ExternalTool,
    pub fpm: ExternalTool,
}

impl Toolset {
    /// Resolve every tool, failing on the first one that is missing
    pub fn resolve(locator: &dyn ToolLocator) -> Result<Self> {
        Ok(Self {
            wget: locator.locate(WGET)?,
            tar: locator.locate(TAR)?,
            fpm: locator.locate(FPM)?,
        })
    }
}
