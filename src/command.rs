//! Argument-list process invocation
//!
//! Commands are described as a program plus discrete arguments and are never
//! passed through a shell, so paths and descriptions with spaces need no
//! quoting.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PackagerError, Result};
use crate::tools::ExternalTool;

/// A fully described external command invocation
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

/// Exit code and combined output of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: i32,
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

impl CommandSpec {
    pub fn new(tool: &ExternalTool) -> Self {
        Self {
            program: tool.path.clone(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Run to completion, capturing stdout and stderr
    pub async fn output(&self) -> Result<CommandOutput> {
        debug!("running '{}'", self);

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| PackagerError::Spawn {
            command: self.to_string(),
            source,
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            // Killed by a signal: no exit code
            status: output.status.code().unwrap_or(-1),
            output: combined.trim().to_string(),
        })
    }

    /// Run and turn a non-zero exit status into [`PackagerError::CommandFailed`]
    pub async fn run(&self) -> Result<CommandOutput> {
        let result = self.output().await?;
        if !result.success() {
            debug!(
                "'{}' failed, exit status={}, output='{}'",
                self, result.status, result.output
            );
            return Err(PackagerError::CommandFailed {
                command: self.to_string(),
                status: result.status,
                output: result.output,
            });
        }
        Ok(result)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
