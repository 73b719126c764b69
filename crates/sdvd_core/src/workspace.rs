//! Scratch workspace for intermediate artifacts.
//!
//! The workspace is a scoped resource: creating it wipes any stale tree,
//! and dropping it (or calling [`Workspace::release`]) removes it again on
//! every exit path. A retained disc image inside the workspace survives
//! release; everything else is deleted.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Filesystem failures while managing the workspace.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to remove stale workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to clean up workspace {path}: {source}")]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Artifact locations inside a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Transcoded media file name.
    pub const MEDIA_FILE: &'static str = "output.mpg";
    /// Authoring descriptor file name.
    pub const DESCRIPTOR_FILE: &'static str = "dvd.xml";
    /// Authored structure directory name.
    pub const AUTHORED_DIR: &'static str = "DVD";
    /// Image file name used when no output path is requested.
    pub const DEFAULT_IMAGE: &'static str = "dvd.iso";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn media_path(&self) -> PathBuf {
        self.root.join(Self::MEDIA_FILE)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(Self::DESCRIPTOR_FILE)
    }

    pub fn authored_dir(&self) -> PathBuf {
        self.root.join(Self::AUTHORED_DIR)
    }

    pub fn default_image_path(&self) -> PathBuf {
        self.root.join(Self::DEFAULT_IMAGE)
    }

    /// Where the mastering stage writes the image.
    ///
    /// Unset means `dvd.iso` in the workspace; relative paths are taken
    /// relative to the workspace root; absolute paths are used as-is.
    pub fn image_path(&self, requested: Option<&Path>) -> PathBuf {
        match requested {
            None => self.default_image_path(),
            Some(path) if path.as_os_str().is_empty() => self.default_image_path(),
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => self.root.join(path),
        }
    }
}

/// Owned scratch directory, released on drop.
#[derive(Debug)]
pub struct Workspace {
    layout: WorkspaceLayout,
    retained: Option<PathBuf>,
    keep: bool,
    released: bool,
}

impl Workspace {
    /// Create a fresh workspace at `root`, deleting any previous tree there.
    pub fn create(root: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let root = std::path::absolute(root.as_ref()).map_err(|source| WorkspaceError::Create {
            path: root.as_ref().to_path_buf(),
            source,
        })?;

        match fs::remove_dir_all(&root) {
            Ok(()) => tracing::debug!("Removed stale workspace {}", root.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(WorkspaceError::Remove { path: root, source }),
        }

        fs::create_dir_all(&root).map_err(|source| WorkspaceError::Create {
            path: root.clone(),
            source,
        })?;

        Ok(Self {
            layout: WorkspaceLayout::new(root),
            retained: None,
            keep: false,
            released: false,
        })
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Mark a file that must survive release.
    pub fn retain(&mut self, path: impl Into<PathBuf>) {
        self.retained = Some(path.into());
    }

    /// Forget any retained file (used when the job failed).
    pub fn clear_retained(&mut self) {
        self.retained = None;
    }

    /// Leave the whole workspace on disk.
    pub fn keep(&mut self) {
        self.keep = true;
    }

    /// Remove the workspace now, reporting failures.
    pub fn release(mut self) -> Result<(), WorkspaceError> {
        self.released = true;
        self.cleanup()
    }

    fn cleanup(&self) -> Result<(), WorkspaceError> {
        if self.keep {
            tracing::info!("Keeping workspace {}", self.root().display());
            return Ok(());
        }

        let root = self.root();
        let retained = self
            .retained
            .as_deref()
            .filter(|path| is_nested_under(path, root));

        match retained {
            Some(keep) => prune(root, keep),
            None => match fs::remove_dir_all(root) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(WorkspaceError::Release {
                    path: root.to_path_buf(),
                    source,
                }),
            },
        }
    }
}

/// Whether `path` lies strictly below `root` without `..` hops.
fn is_nested_under(path: &Path, root: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rel) => {
            rel.components().next().is_some()
                && rel.components().all(|c| matches!(c, Component::Normal(_)))
        }
        Err(_) => false,
    }
}

/// Remove everything under `dir` except `keep` and the directories leading to it.
fn prune(dir: &Path, keep: &Path) -> Result<(), WorkspaceError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(WorkspaceError::Release {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|source| WorkspaceError::Release {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path == keep {
            continue;
        }
        let is_dir = path.is_dir();
        if is_dir && keep.starts_with(&path) {
            prune(&path, keep)?;
            continue;
        }
        let result = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|source| WorkspaceError::Release { path, source })?;
    }

    Ok(())
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.cleanup() {
            tracing::warn!("{}", e);
        }
    }
}
