//! Archive download through the external download utility

use std::path::{Path, PathBuf};

use log::info;

use crate::command::CommandSpec;
use crate::error::Result;
use crate::tools::ExternalTool;

/// Downloads URLs with `wget`
#[derive(Debug, Clone)]
pub struct Fetcher {
    wget: ExternalTool,
}

impl Fetcher {
    pub fn new(wget: ExternalTool) -> Self {
        Self { wget }
    }

    /// Command that downloads `url` to `dest`, overwriting it
    pub fn command(&self, url: &str, dest: &Path) -> CommandSpec {
        CommandSpec::new(&self.wget)
            .arg("-q")
            .arg(url)
            .arg("-O")
            .arg(dest)
    }

    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        info!("downloading precompiled Telegram package '{}'", url);
        self.command(url, dest).run().await?;
        Ok(dest.to_path_buf())
    }
}

/// File name for the downloaded archive, taken from the URL's last segment
pub fn archive_file_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "release.tar.xz".to_string())
}
