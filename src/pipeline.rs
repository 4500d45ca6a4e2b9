//! End-to-end packaging run
//!
//! `Start → ToolsResolved → Downloaded → Extracted → Staged → Packaged →
//! CleanedUp`; any error ends the run in `Failed`.

use std::fmt;
use std::path::PathBuf;

use log::{debug, warn};

use crate::config::BuildOptions;
use crate::error::{PackagerError, Result};
use crate::fetch::{self, Fetcher};
use crate::package::Packager;
use crate::release::{GitHubClient, ReleaseQuery, ReleaseResolver, ResolvedRelease};
use crate::stage::{Stager, StagingLayout};
use crate::tools::{ToolLocator, Toolset};

/// Progress of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    ToolsResolved,
    Downloaded,
    Extracted,
    Staged,
    Packaged,
    CleanedUp,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Start => "start",
            PipelineState::ToolsResolved => "tools resolved",
            PipelineState::Downloaded => "downloaded",
            PipelineState::Extracted => "extracted",
            PipelineState::Staged => "staged",
            PipelineState::Packaged => "packaged",
            PipelineState::CleanedUp => "cleaned up",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub release: ResolvedRelease,
    pub output_dir: PathBuf,
}

/// Drives one packaging run from release lookup to cleanup
pub struct Pipeline<'a> {
    options: BuildOptions,
    locator: &'a dyn ToolLocator,
    arch: Option<String>,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(options: BuildOptions, locator: &'a dyn ToolLocator) -> Self {
        Self {
            options,
            locator,
            arch: None,
            state: PipelineState::Start,
        }
    }

    /// Check `arch` instead of the host architecture
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        debug!("pipeline: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Run every stage; the staging root is removed on all exit paths
    /// unless `keep_staging_on_failure` is set and the run fails.
    pub async fn run(&mut self) -> Result<PackageOutcome> {
        let tools = match Toolset::resolve(self.locator) {
            Ok(tools) => tools,
            Err(e) => {
                self.advance(PipelineState::Failed);
                return Err(e);
            }
        };
        self.advance(PipelineState::ToolsResolved);

        let layout = match StagingLayout::create(
            self.options.staging_parent.as_deref(),
            &self.options.profile,
        ) {
            Ok(layout) => layout,
            Err(e) => {
                self.advance(PipelineState::Failed);
                return Err(e);
            }
        };

        match self.stages(&tools, &layout).await {
            Ok(release) => {
                let cleanup = layout.remove();
                self.complete(release, cleanup)
            }
            Err(e) => {
                let failed_in = self.state;
                self.advance(PipelineState::Failed);
                debug!("run stopped after stage '{}'", failed_in);

                if self.options.keep_staging_on_failure {
                    let kept = layout.keep();
                    warn!("keeping staging directory '{}'", kept.display());
                } else if let Err(cleanup) = layout.remove() {
                    warn!("{}", cleanup);
                }
                Err(e)
            }
        }
    }

    /// Finish a packaged run once the staging root removal has been attempted
    fn complete(&mut self, release: ResolvedRelease, cleanup: Result<()>) -> Result<PackageOutcome> {
        if let Err(e) = cleanup {
            self.advance(PipelineState::Failed);
            return Err(e);
        }
        self.advance(PipelineState::CleanedUp);
        Ok(PackageOutcome {
            release,
            output_dir: self.options.output_dir.clone(),
        })
    }

    async fn stages(&mut self, tools: &Toolset, layout: &StagingLayout) -> Result<ResolvedRelease> {
        let profile = self.options.profile.clone();

        let client = GitHubClient::new(&self.options.api_url)?;
        let resolver = match &self.arch {
            Some(arch) => ReleaseResolver::with_arch(client, &profile.asset_label, arch.as_str()),
            None => ReleaseResolver::new(client, &profile.asset_label),
        };
        let query = ReleaseQuery {
            owner: profile.owner.clone(),
            project: profile.project.clone(),
            version: self.options.version.clone(),
        };
        let release = resolver.resolve(&query).await?;

        let archive = layout
            .download_base()
            .join(fetch::archive_file_name(&release.download_url));
        std::fs::create_dir_all(layout.download_base())
            .map_err(|e| PackagerError::io("failed to create download directory", e))?;
        Fetcher::new(tools.wget.clone())
            .fetch(&release.download_url, &archive)
            .await?;
        self.advance(PipelineState::Downloaded);

        let stager = Stager::new(
            tools.tar.clone(),
            profile.clone(),
            self.options.files_dir.clone(),
        );
        stager.extract(&archive, layout).await?;
        self.advance(PipelineState::Extracted);

        let install_base = stager.assemble(layout)?;
        self.advance(PipelineState::Staged);

        Packager::new(tools.fpm.clone(), profile, self.options.format)
            .build(&release.version, &install_base, &self.options.output_dir)
            .await?;
        self.advance(PipelineState::Packaged);
        Ok(release)
    }
}
