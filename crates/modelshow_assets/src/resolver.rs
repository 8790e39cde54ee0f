//! # Buffer Resolver
//!
//! Exact-name lookup of companion buffer files across an ordered list of
//! directories. The first directory holding the file wins.

use std::path::{Path, PathBuf};

use crate::directory::{display_dir, DirectoryPriorityList};
use crate::error::{AssetError, AssetResult};

/// Searches buffer directories in a fixed order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferResolver {
    dirs: Vec<PathBuf>,
}

impl BufferResolver {
    /// Creates a resolver over `dirs`, searched in the given order.
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Creates a resolver over every directory of the priority list.
    #[must_use]
    pub fn from_priority_list(list: &DirectoryPriorityList) -> Self {
        Self::new(list.paths())
    }

    /// The search order.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Searched directories, rendered for diagnostics.
    #[must_use]
    pub fn searched(&self) -> Vec<String> {
        self.dirs.iter().map(|d| display_dir(d)).collect()
    }

    /// Returns the first `dir/filename` that is a regular file.
    ///
    /// # Errors
    ///
    /// [`AssetError::NotFound`] if no directory holds the file, or if the
    /// filename is not a single plain path component.
    pub fn resolve(&self, filename: &str) -> AssetResult<PathBuf> {
        if !is_plain_file_name(filename) {
            tracing::warn!(filename, "Rejected buffer filename");
            return Err(self.not_found(filename));
        }

        for dir in &self.dirs {
            let candidate = dir.join(filename);
            let exists = candidate.is_file();
            tracing::debug!(path = %candidate.display(), exists, "Probing buffer location");
            if exists {
                return Ok(candidate);
            }
        }

        Err(self.not_found(filename))
    }

    fn not_found(&self, filename: &str) -> AssetError {
        AssetError::NotFound {
            what: format!("buffer file {filename}"),
            searched: self.searched(),
        }
    }
}

/// A single normal path component: no separators, not `.` or `..`.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}
