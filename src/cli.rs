//! CLI argument parsing for make-telegram-deb

use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppProfile, BuildOptions, DEFAULT_API_URL, PackageFormat, default_files_dir};

/// Command-line arguments for make-telegram-deb
#[derive(Parser, Debug, Clone)]
#[command(name = "make-telegram-deb")]
#[command(about = "Build a .deb package from the official Telegram Desktop Linux binaries")]
pub struct Args {
    /// Directory where to put the generated package
    #[arg(long, visible_alias = "result-dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Version to download (with or without a leading "v"); latest if omitted
    #[arg(long, value_name = "VERSION", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub version: Option<String>,

    /// Package type to produce
    #[arg(long, value_enum, default_value_t = PackageFormat::Deb)]
    pub format: PackageFormat,

    /// Maintainer recorded in the package metadata
    #[arg(long)]
    pub maintainer: Option<String>,

    /// Directory holding the bundled `usr/` and `opt/` overlay
    #[arg(long, value_name = "DIR")]
    pub files_dir: Option<PathBuf>,

    /// Keep the staging directory when packaging fails
    #[arg(long)]
    pub keep_staging: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Release API base URL
    #[arg(long, hide = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl Args {
    /// Resolve defaults and turn the flags into [`BuildOptions`]
    pub fn into_options(self) -> std::io::Result<BuildOptions> {
        let output_dir = match self.dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let files_dir = self.files_dir.unwrap_or_else(default_files_dir);

        let mut profile = AppProfile::default();
        if let Some(maintainer) = self.maintainer {
            profile.maintainer = maintainer;
        }

        let mut options = BuildOptions::new(output_dir, files_dir);
        options.profile = profile;
        options.version = self.version;
        options.format = self.format;
        options.api_url = self.api_url;
        options.keep_staging_on_failure = self.keep_staging;
        Ok(options)
    }
}
