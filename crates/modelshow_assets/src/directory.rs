//! # Directory Priority List
//!
//! The ordered set of filesystem locations consulted when resolving the
//! current model and companion buffers.
//!
//! ```text
//! index 0   Primary    scanned: first .glb, else first .gltf
//! index 1.. Fallback   probed:  exactly one expected file each
//! ```

use std::path::{Path, PathBuf};

/// Semantic role of a directory in the priority list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectoryRole {
    /// Scanned exhaustively; its extension preference wins.
    Primary,
    /// Probed for a single expected filename.
    Fallback,
}

/// One entry of the priority list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDirectory {
    /// Location on disk.
    pub path: PathBuf,
    /// Role in the search order.
    pub role: DirectoryRole,
    /// Label reported by model listings (`gltf`, `3dtiles`, ...).
    pub tag: String,
    /// URL segment the directory is served under, if any.
    pub mount: Option<String>,
    /// The one file a fallback directory is checked for.
    pub expected_file: Option<String>,
}

impl AssetDirectory {
    /// Creates the primary directory.
    pub fn primary(path: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: DirectoryRole::Primary,
            tag: tag.into(),
            mount: None,
            expected_file: None,
        }
    }

    /// Creates a fallback directory probed for `expected_file`.
    pub fn fallback(
        path: impl Into<PathBuf>,
        tag: impl Into<String>,
        expected_file: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            role: DirectoryRole::Fallback,
            tag: tag.into(),
            mount: None,
            expected_file: Some(expected_file.into()),
        }
    }

    /// Serves the directory under `/<mount>/`.
    #[must_use]
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = Some(mount.into());
        self
    }

    /// Full path of the expected fallback file, if one is configured.
    #[must_use]
    pub fn expected_path(&self) -> Option<PathBuf> {
        self.expected_file.as_ref().map(|file| self.path.join(file))
    }
}

/// Ordered directories, primary first.
///
/// The constructor enforces the shape, so every list in circulation has
/// exactly one primary at index 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryPriorityList {
    directories: Vec<AssetDirectory>,
}

impl DirectoryPriorityList {
    /// Builds the list from a primary directory and ordered fallbacks.
    ///
    /// Roles are normalized: the first entry becomes [`DirectoryRole::Primary`]
    /// and every other entry [`DirectoryRole::Fallback`].
    #[must_use]
    pub fn new(primary: AssetDirectory, fallbacks: Vec<AssetDirectory>) -> Self {
        let mut directories = Vec::with_capacity(fallbacks.len() + 1);
        directories.push(AssetDirectory {
            role: DirectoryRole::Primary,
            ..primary
        });
        directories.extend(fallbacks.into_iter().map(|dir| AssetDirectory {
            role: DirectoryRole::Fallback,
            ..dir
        }));
        Self { directories }
    }

    /// The primary directory.
    #[must_use]
    pub fn primary(&self) -> &AssetDirectory {
        &self.directories[0]
    }

    /// Fallback directories in priority order.
    #[must_use]
    pub fn fallbacks(&self) -> &[AssetDirectory] {
        &self.directories[1..]
    }

    /// All directories in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetDirectory> {
        self.directories.iter()
    }

    /// Directory paths in priority order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.directories.iter().map(|d| d.path.clone()).collect()
    }

    /// Number of directories, primary included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Always false; a list has at least its primary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Finds the directory mounted under `mount`.
    #[must_use]
    pub fn by_mount(&self, mount: &str) -> Option<&AssetDirectory> {
        self.directories
            .iter()
            .find(|d| d.mount.as_deref() == Some(mount))
    }
}

/// Renders a directory as a searched location (`dir/`).
pub(crate) fn display_dir(path: &Path) -> String {
    let mut shown = path.display().to_string();
    if !shown.ends_with('/') {
        shown.push('/');
    }
    shown
}
