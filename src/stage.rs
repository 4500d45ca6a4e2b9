//! Staging tree assembly
//!
//! The staging root mirrors the filesystem the package installs into:
//!
//! ```text
//! <root>/download/<project>/      extracted upstream archive
//! <root>/install/opt/<app>/       application tree
//! <root>/install/usr/...          desktop integration overlay
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::command::CommandSpec;
use crate::config::AppProfile;
use crate::error::{PackagerError, Result};
use crate::tools::ExternalTool;

/// A temporary directory tree exclusively owned by one run
///
/// Dropping the layout removes the whole tree; [`StagingLayout::keep`]
/// leaves it on disk instead.
#[derive(Debug)]
pub struct StagingLayout {
    root: TempDir,
    project: String,
    app: String,
}

impl StagingLayout {
    /// Create a fresh, uniquely named staging root
    pub fn create(parent: Option<&Path>, profile: &AppProfile) -> Result<Self> {
        let prefix = format!("{}-deb-", profile.app);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let root = match parent {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .map_err(|e| PackagerError::io("failed to create staging directory", e))?;

        debug!("temporary work directory is '{}'", root.path().display());

        Ok(Self {
            root,
            project: profile.project.clone(),
            app: profile.app.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// `download/` holding the fetched archive
    pub fn download_base(&self) -> PathBuf {
        self.root().join("download")
    }

    /// `download/<project>/`, the extraction target
    pub fn download_dir(&self) -> PathBuf {
        self.download_base().join(&self.project)
    }

    /// `install/`, the root handed to the packager
    pub fn install_base(&self) -> PathBuf {
        self.root().join("install")
    }

    /// `install/opt/<app>/`
    pub fn install_dir(&self) -> PathBuf {
        self.install_base().join("opt").join(&self.app)
    }

    /// Leave the tree on disk and return its path
    pub fn keep(self) -> PathBuf {
        self.root.keep()
    }

    /// Remove the tree now, reporting failures
    pub fn remove(self) -> Result<()> {
        let path = self.root().to_path_buf();
        self.root
            .close()
            .map_err(|e| PackagerError::io(format!("failed to remove '{}'", path.display()), e))
    }
}

/// Extracts the upstream archive and assembles the install tree
#[derive(Debug, Clone)]
pub struct Stager {
    tar: ExternalTool,
    profile: AppProfile,
    files_dir: PathBuf,
}

impl Stager {
    pub fn new(tar: ExternalTool, profile: AppProfile, files_dir: PathBuf) -> Self {
        Self {
            tar,
            profile,
            files_dir,
        }
    }

    /// Command unpacking an xz tarball into `target`
    pub fn extract_command(&self, archive: &Path, target: &Path) -> CommandSpec {
        CommandSpec::new(&self.tar)
            .arg("xfJ")
            .arg(archive)
            .arg("-C")
            .arg(target)
    }

    /// Unpack `archive` into `download/<project>/` and delete the archive
    pub async fn extract(&self, archive: &Path, layout: &StagingLayout) -> Result<PathBuf> {
        let target = layout.download_dir();
        fs::create_dir_all(&target)
            .map_err(|e| PackagerError::io(format!("failed to create '{}'", target.display()), e))?;

        self.extract_command(archive, &target).run().await?;

        if let Err(e) = fs::remove_file(archive) {
            warn!("failed to remove archive '{}': {}", archive.display(), e);
        }

        Ok(target)
    }

    /// Build `install/` from the extracted tree and the auxiliary files
    pub fn assemble(&self, layout: &StagingLayout) -> Result<PathBuf> {
        let extracted = layout.download_dir().join(&self.profile.archive_root);
        let install_dir = layout.install_dir();

        debug!(
            "copying '{}' to '{}'",
            extracted.display(),
            install_dir.display()
        );
        copy_tree(&extracted, &install_dir)?;

        let upstream_exe = install_dir.join(&self.profile.upstream_executable);
        let exe = install_dir.join(&self.profile.executable);
        require(&upstream_exe)?;
        fs::rename(&upstream_exe, &exe).map_err(|e| {
            PackagerError::io(format!("failed to rename '{}'", upstream_exe.display()), e)
        })?;

        let usr_overlay = self.files_dir.join("usr");
        debug!(
            "copying '{}' to '{}'",
            usr_overlay.display(),
            layout.install_base().display()
        );
        copy_tree(&usr_overlay, &layout.install_base().join("usr"))?;

        let opt_overlay = self.files_dir.join("opt").join(&self.profile.app);
        copy_tree(&opt_overlay, &install_dir)?;

        info!("staged install tree at '{}'", layout.install_base().display());
        Ok(layout.install_base())
    }
}

fn require(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PackagerError::MissingPath(path.to_path_buf()))
    }
}

/// Recursively copy `src` onto `dst`, creating `dst` and overwriting files
///
/// Symlinks are recreated rather than followed. Permissions travel with
/// `fs::copy`.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(PackagerError::MissingPath(src.to_path_buf()));
    }

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk '{}'", src.display());
            PackagerError::io(context, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| PackagerError::MissingPath(entry.path().to_path_buf()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                PackagerError::io(format!("failed to create '{}'", target.display()), e)
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| {
                PackagerError::io(
                    format!(
                        "failed to copy '{}' to '{}'",
                        entry.path().display(),
                        target.display()
                    ),
                    e,
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src)
        .map_err(|e| PackagerError::io(format!("failed to read link '{}'", src.display()), e))?;
    if dst.symlink_metadata().is_ok() {
        fs::remove_file(dst)
            .map_err(|e| PackagerError::io(format!("failed to replace '{}'", dst.display()), e))?;
    }
    std::os::unix::fs::symlink(&link, dst)
        .map_err(|e| PackagerError::io(format!("failed to link '{}'", dst.display()), e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .map(|_| ())
        .map_err(|e| PackagerError::io(format!("failed to copy '{}'", src.display()), e))
}
