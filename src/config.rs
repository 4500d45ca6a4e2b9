//! Application identity and per-run build options

use std::path::PathBuf;

use clap::ValueEnum;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Fixed identity of the packaged application (mirrors upstream layout).
#[derive(Debug, Clone)]
pub struct AppProfile {
    /// GitHub owner of the upstream repository
    pub owner: String,
    /// GitHub repository name, also the download subdirectory
    pub project: String,
    /// Package name and `/opt/<app>` directory
    pub app: String,
    /// Top-level directory inside the upstream archive
    pub archive_root: String,
    /// Executable shipped by upstream
    pub upstream_executable: String,
    /// Executable name inside the package
    pub executable: String,
    /// Label identifying the Linux x86_64 asset
    pub asset_label: String,
    pub description: String,
    pub maintainer: String,
    pub compression: String,
}

impl Default for AppProfile {
    fn default() -> Self {
        Self {
            owner: "telegramdesktop".to_string(),
            project: "tdesktop".to_string(),
            app: "telegram".to_string(),
            archive_root: "Telegram".to_string(),
            upstream_executable: "Telegram".to_string(),
            executable: "telegram".to_string(),
            asset_label: "Linux 64 bit: Binary".to_string(),
            description: "Telegram Desktop".to_string(),
            maintainer: "Konstantin Sorokin <kvs@sigterm.ru>".to_string(),
            compression: "xz".to_string(),
        }
    }
}

/// Package type handed to fpm as `--output-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageFormat {
    #[default]
    Deb,
    Rpm,
}

impl PackageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageFormat::Deb => "deb",
            PackageFormat::Rpm => "rpm",
        }
    }

    /// fpm flag selecting the payload compression for this format
    pub fn compression_flag(&self) -> &'static str {
        match self {
            PackageFormat::Deb => "--deb-compression",
            PackageFormat::Rpm => "--rpm-compression",
        }
    }
}

/// Everything one pipeline run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub profile: AppProfile,
    /// Where the finished package is written
    pub output_dir: PathBuf,
    /// Specific release to package; latest when absent
    pub version: Option<String>,
    pub format: PackageFormat,
    /// Auxiliary `usr/` and `opt/` tree overlaid onto the staging root
    pub files_dir: PathBuf,
    pub api_url: String,
    /// Parent directory for the staging root; system temp dir when absent
    pub staging_parent: Option<PathBuf>,
    /// Leave the staging root behind when the run fails
    pub keep_staging_on_failure: bool,
}

impl BuildOptions {
    pub fn new(output_dir: PathBuf, files_dir: PathBuf) -> Self {
        Self {
            profile: AppProfile::default(),
            output_dir,
            version: None,
            format: PackageFormat::default(),
            files_dir,
            api_url: DEFAULT_API_URL.to_string(),
            staging_parent: None,
            keep_staging_on_failure: false,
        }
    }
}

/// Locate the auxiliary tree shipped alongside the tool
///
/// Checks `files/` next to the running executable first, then the source
/// checkout the binary was built from.
pub fn default_files_dir() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("files")));

    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("files"),
    }
}
