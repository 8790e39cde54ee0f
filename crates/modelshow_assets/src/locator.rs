//! # Asset Locator
//!
//! Picks the single "current" model from a [`DirectoryPriorityList`].
//!
//! 1. The primary directory is listed (sorted by name). The first `.glb` wins;
//!    without one, the first `.gltf`.
//! 2. Otherwise each fallback directory is probed for its expected file, in
//!    order. Fallbacks are never scanned.
//! 3. Otherwise [`AssetError::NotFound`] with every searched location.
//!
//! The result depends only on what is on disk. Nothing is cached; callers
//! run this on every request.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::directory::{display_dir, AssetDirectory, DirectoryPriorityList};
use crate::error::{AssetError, AssetResult};
use crate::{has_extension, BINARY_EXTENSION, DESCRIPTOR_EXTENSION};

/// How a model file is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Self-contained `.glb`, sent as-is.
    Binary,
    /// Text `.gltf` descriptor, sent after reference rewriting.
    Descriptor,
}

impl AssetKind {
    /// Classifies a filename by extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        if has_extension(name, BINARY_EXTENSION) {
            Some(Self::Binary)
        } else if has_extension(name, DESCRIPTOR_EXTENSION) {
            Some(Self::Descriptor)
        } else {
            None
        }
    }

    /// Media type of the delivered payload.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Binary => "model/gltf-binary",
            Self::Descriptor => "model/gltf+json",
        }
    }
}

/// A resolved model file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetCandidate {
    /// Location on disk.
    pub path: PathBuf,
    /// Delivery kind.
    pub kind: AssetKind,
    /// Tag of the directory the file came from.
    pub tag: String,
}

impl AssetCandidate {
    /// The file name, for logs and headers.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Resolves the current model.
///
/// # Errors
///
/// [`AssetError::NotFound`] when no directory yields a model, with the
/// searched locations in order. [`AssetError::Io`] when the primary directory
/// exists but cannot be listed.
pub fn locate_current_model(dirs: &DirectoryPriorityList) -> AssetResult<AssetCandidate> {
    let primary = dirs.primary();
    let mut searched = vec![display_dir(&primary.path)];

    if let Some(candidate) = scan_primary(primary)? {
        tracing::debug!(
            file = %candidate.path.display(),
            "Current model found in primary directory"
        );
        return Ok(candidate);
    }

    tracing::debug!(
        dir = %primary.path.display(),
        "No model in primary directory, probing fallbacks"
    );

    for fallback in dirs.fallbacks() {
        let Some(expected) = fallback.expected_path() else {
            continue;
        };
        let Some(kind) = AssetKind::from_file_name(&expected.to_string_lossy()) else {
            tracing::warn!(file = %expected.display(), "Fallback expects a non-model file, skipped");
            searched.push(expected.display().to_string());
            continue;
        };
        if expected.is_file() {
            tracing::debug!(file = %expected.display(), "Current model found in fallback");
            return Ok(AssetCandidate {
                path: expected,
                kind,
                tag: fallback.tag.clone(),
            });
        }
        searched.push(expected.display().to_string());
    }

    Err(AssetError::NotFound {
        what: "model".to_string(),
        searched,
    })
}

/// Scans the primary directory. A missing directory is simply empty.
fn scan_primary(dir: &AssetDirectory) -> AssetResult<Option<AssetCandidate>> {
    let names = match sorted_file_names(&dir.path) {
        Ok(names) => names,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AssetError::io(&dir.path, e)),
    };

    let pick = |kind: AssetKind| {
        names
            .iter()
            .find(|name| AssetKind::from_file_name(name) == Some(kind))
    };

    Ok(pick(AssetKind::Binary)
        .map(|name| (name, AssetKind::Binary))
        .or_else(|| pick(AssetKind::Descriptor).map(|name| (name, AssetKind::Descriptor)))
        .map(|(name, kind)| AssetCandidate {
            path: dir.path.join(name),
            kind,
            tag: dir.tag.clone(),
        }))
}

/// Names of the regular files in `path`, sorted.
pub(crate) fn sorted_file_names(path: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        // Follows symlinks, like the static file service does.
        if !entry.path().is_file() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryRole;
    use tempfile::TempDir;

    struct Layout {
        _root: TempDir,
        dirs: DirectoryPriorityList,
        primary: PathBuf,
        fallback: PathBuf,
    }

    fn layout() -> Layout {
        let root = TempDir::new().unwrap();
        let primary = root.path().join("primary");
        let fallback = root.path().join("fallback");
        fs::create_dir_all(&primary).unwrap();
        fs::create_dir_all(&fallback).unwrap();
        let dirs = DirectoryPriorityList::new(
            AssetDirectory::primary(&primary, "gltf"),
            vec![AssetDirectory::fallback(&fallback, "test", "engine.gltf")],
        );
        Layout {
            _root: root,
            dirs,
            primary,
            fallback,
        }
    }

    #[test]
    fn test_binary_beats_descriptor_in_primary() {
        let l = layout();
        fs::write(l.primary.join("a_scene.gltf"), "{}").unwrap();
        fs::write(l.primary.join("z_scene.glb"), b"glTF").unwrap();

        let found = locate_current_model(&l.dirs).unwrap();
        assert_eq!(found.path, l.primary.join("z_scene.glb"));
        assert_eq!(found.kind, AssetKind::Binary);
        assert_eq!(found.tag, "gltf");
    }

    #[test]
    fn test_first_sorted_descriptor_wins() {
        let l = layout();
        fs::write(l.primary.join("b.gltf"), "{}").unwrap();
        fs::write(l.primary.join("a.gltf"), "{}").unwrap();
        fs::write(l.primary.join("a.bin"), b"\0").unwrap();

        let found = locate_current_model(&l.dirs).unwrap();
        assert_eq!(found.path, l.primary.join("a.gltf"));
        assert_eq!(found.kind, AssetKind::Descriptor);
    }

    #[test]
    fn test_uppercase_extension_counts() {
        let l = layout();
        fs::write(l.primary.join("SCENE.GLB"), b"glTF").unwrap();
        assert_eq!(locate_current_model(&l.dirs).unwrap().kind, AssetKind::Binary);
    }

    #[test]
    fn test_fallback_returns_exact_expected_file() {
        let l = layout();
        // A scan of the fallback would pick this one first.
        fs::write(l.fallback.join("aaa.glb"), b"glTF").unwrap();
        fs::write(l.fallback.join("engine.gltf"), "{}").unwrap();

        let found = locate_current_model(&l.dirs).unwrap();
        assert_eq!(found.path, l.fallback.join("engine.gltf"));
        assert_eq!(found.tag, "test");
        assert_eq!(found.kind, AssetKind::Descriptor);
    }

    #[test]
    fn test_fallback_without_expected_file_is_ignored() {
        let l = layout();
        fs::write(l.fallback.join("other.glb"), b"glTF").unwrap();

        match locate_current_model(&l.dirs) {
            Err(AssetError::NotFound { searched, .. }) => {
                assert_eq!(searched.len(), 2);
                assert!(searched[0].ends_with('/'));
                assert!(searched[1].ends_with("engine.gltf"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_primary_directory_falls_through() {
        let l = layout();
        fs::remove_dir(&l.primary).unwrap();
        fs::write(l.fallback.join("engine.gltf"), "{}").unwrap();
        assert_eq!(
            locate_current_model(&l.dirs).unwrap().path,
            l.fallback.join("engine.gltf")
        );
    }

    #[test]
    fn test_primary_that_is_a_file_is_an_io_error() {
        let l = layout();
        fs::remove_dir(&l.primary).unwrap();
        fs::write(&l.primary, b"not a directory").unwrap();
        let err = locate_current_model(&l.dirs).unwrap_err();
        assert_eq!(err.kind(), "io_failure");
    }

    #[test]
    fn test_subdirectories_are_not_models() {
        let l = layout();
        fs::create_dir(l.primary.join("nested.glb")).unwrap();
        fs::write(l.primary.join("real.gltf"), "{}").unwrap();
        assert_eq!(
            locate_current_model(&l.dirs).unwrap().path,
            l.primary.join("real.gltf")
        );
    }

    #[test]
    fn test_selection_is_stable_across_calls() {
        let l = layout();
        for name in ["c.glb", "a.glb", "b.glb"] {
            fs::write(l.primary.join(name), b"glTF").unwrap();
        }
        let first = locate_current_model(&l.dirs).unwrap();
        for _ in 0..5 {
            assert_eq!(locate_current_model(&l.dirs).unwrap(), first);
        }
        assert_eq!(first.path, l.primary.join("a.glb"));
        assert_eq!(l.dirs.primary().role, DirectoryRole::Primary);
    }

    #[test]
    fn test_fallback_with_non_model_expected_file_is_skipped() {
        let root = TempDir::new().unwrap();
        let notes = root.path().join("notes");
        let models = root.path().join("models");
        fs::create_dir_all(&notes).unwrap();
        fs::create_dir_all(&models).unwrap();
        fs::write(notes.join("notes.txt"), "not a model").unwrap();
        fs::write(models.join("engine.glb"), b"glTF").unwrap();
        let dirs = DirectoryPriorityList::new(
            AssetDirectory::primary(root.path().join("missing"), "gltf"),
            vec![
                AssetDirectory::fallback(&notes, "notes", "notes.txt"),
                AssetDirectory::fallback(&models, "test", "engine.glb"),
            ],
        );

        let found = locate_current_model(&dirs).unwrap();
        assert_eq!(found.path, models.join("engine.glb"));
        assert_eq!(found.kind, AssetKind::Binary);
    }
}
