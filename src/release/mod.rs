//! Release discovery
//!
//! Resolves which upstream release to package and where its Linux x86_64
//! archive can be downloaded from.
//!
//! ## Module Organization
//!
//! - `platform` - Host architecture guard
//! - `github` - GitHub API interaction for release discovery
//! - `version` - Tag/version normalization

mod github;
mod platform;
pub mod version;

use log::info;

use crate::error::{PackagerError, Result};

pub use github::{GitHubAsset, GitHubClient, GitHubRelease};
pub use platform::{SUPPORTED_ARCH, ensure_supported, host_arch};

/// Which upstream repository and which release to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub owner: String,
    pub project: String,
    /// Requested release, with or without the `v` prefix; latest when absent
    pub version: Option<String>,
}

/// A release ready to be downloaded and packaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub download_url: String,
    /// Package version, never `v`-prefixed
    pub version: String,
}

/// Release with the given tag from a newest-first list
pub fn select_release<'a>(releases: &'a [GitHubRelease], tag: &str) -> Option<&'a GitHubRelease> {
    releases.iter().find(|r| r.tag_name == tag)
}

/// Pick the labeled asset out of `release` and normalize its version
pub fn resolve_asset(release: &GitHubRelease, label: &str) -> Result<ResolvedRelease> {
    let asset = release
        .asset_labeled(label)
        .ok_or(PackagerError::NoPrecompiledBinaries)?;

    Ok(ResolvedRelease {
        download_url: asset.browser_download_url.clone(),
        version: version::to_package_version(&release.tag_name),
    })
}

/// Resolves a [`ReleaseQuery`] against the release API
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    client: GitHubClient,
    arch: String,
    label: String,
}

impl ReleaseResolver {
    /// Resolver for the running host's architecture
    pub fn new(client: GitHubClient, label: impl Into<String>) -> Self {
        Self::with_arch(client, label, host_arch())
    }

    /// Resolver that checks `arch` instead of the host's architecture
    pub fn with_arch(client: GitHubClient, label: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            client,
            arch: arch.into(),
            label: label.into(),
        }
    }

    pub async fn resolve(&self, query: &ReleaseQuery) -> Result<ResolvedRelease> {
        ensure_supported(&self.arch, &query.project)?;

        let release = match query.version.as_deref().filter(|v| !v.is_empty()) {
            Some(requested) => {
                let tag = version::to_tag(requested);
                let releases = self
                    .client
                    .list_releases(&query.owner, &query.project)
                    .await?;
                select_release(&releases, &tag)
                    .cloned()
                    .ok_or(PackagerError::NoMatchingRelease(tag))?
            }
            None => {
                self.client
                    .latest_release(&query.owner, &query.project)
                    .await?
            }
        };

        let resolved = resolve_asset(&release, &self.label)?;
        info!(
            "resolved {}/{} release {} to '{}'",
            query.owner, query.project, release.tag_name, resolved.download_url
        );
        Ok(resolved)
    }
}
