//! Package creation through fpm

use std::fs;
use std::path::Path;

use log::info;

use crate::command::CommandSpec;
use crate::config::{AppProfile, PackageFormat};
use crate::error::{PackagerError, Result};
use crate::tools::ExternalTool;

/// Builds a distributable package from a staged install tree
#[derive(Debug, Clone)]
pub struct Packager {
    fpm: ExternalTool,
    profile: AppProfile,
    format: PackageFormat,
}

impl Packager {
    pub fn new(fpm: ExternalTool, profile: AppProfile, format: PackageFormat) -> Self {
        Self {
            fpm,
            profile,
            format,
        }
    }

    /// fpm invocation packaging `install_base` as `version`, run inside `output_dir`
    pub fn command(&self, version: &str, install_base: &Path, output_dir: &Path) -> CommandSpec {
        CommandSpec::new(&self.fpm)
            .args(["--input-type", "dir"])
            .args(["--output-type", self.format.as_str()])
            .args(["--name", self.profile.app.as_str()])
            .args(["--version", version])
            .args([self.format.compression_flag(), self.profile.compression.as_str()])
            .args(["--description", self.profile.description.as_str()])
            .args(["--maintainer", self.profile.maintainer.as_str()])
            .arg("--chdir")
            .arg(install_base)
            .arg(".")
            .current_dir(output_dir)
    }

    pub async fn build(&self, version: &str, install_base: &Path, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| {
            PackagerError::io(format!("failed to create '{}'", output_dir.display()), e)
        })?;

        info!("building {} package", self.format.as_str());
        self.command(version, install_base, output_dir).run().await?;
        info!(
            "{} package created in the '{}' directory",
            self.format.as_str(),
            output_dir.display()
        );
        Ok(())
    }
}
