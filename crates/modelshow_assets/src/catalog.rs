//! # Model Catalog
//!
//! Every model file in every directory of the priority list. Unlike the
//! locator there is no winner: the catalog reports all candidates so the
//! viewer can show what is available.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::directory::{AssetDirectory, DirectoryPriorityList};
use crate::locator::{sorted_file_names, AssetKind};

/// Path reported for entries of directories without a static mount.
pub const CURRENT_MODEL_ENDPOINT: &str = "/api/model";

/// One model file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// File name.
    pub name: String,
    /// Tag of the directory the file lives in.
    #[serde(rename = "type")]
    pub tag: String,
    /// Size in bytes.
    pub size: u64,
    /// URL the file can be fetched from.
    pub path: String,
    /// Modification time, RFC 3339. `None` where the platform has no mtime.
    pub last_modified: Option<String>,
}

/// Lists every `.glb`/`.gltf` file across all directories, in priority order
/// and sorted by name within a directory.
///
/// Unreadable or missing directories are skipped with a warning; a listing
/// never fails as a whole.
#[must_use]
pub fn list_models(dirs: &DirectoryPriorityList) -> Vec<ModelEntry> {
    dirs.iter().flat_map(list_directory).collect()
}

fn list_directory(dir: &AssetDirectory) -> Vec<ModelEntry> {
    if !dir.path.exists() {
        return Vec::new();
    }
    let names = match sorted_file_names(&dir.path) {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(dir = %dir.path.display(), error = %e, "Cannot read model directory");
            return Vec::new();
        }
    };

    names
        .into_iter()
        .filter(|name| AssetKind::from_file_name(name).is_some())
        .filter_map(|name| entry(dir, &dir.path.join(&name), name))
        .collect()
}

fn entry(dir: &AssetDirectory, path: &Path, name: String) -> Option<ModelEntry> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Cannot stat model file");
            return None;
        }
    };
    let url = match &dir.mount {
        Some(mount) => format!("/{mount}/{name}"),
        None => CURRENT_MODEL_ENDPOINT.to_string(),
    };
    Some(ModelEntry {
        name,
        tag: dir.tag.clone(),
        size: meta.len(),
        path: url,
        last_modified: meta.modified().ok().map(rfc3339),
    })
}

/// Formats a timestamp as RFC 3339 with second precision (UTC).
#[must_use]
pub fn rfc3339(time: SystemTime) -> String {
    humantime::format_rfc3339_seconds(time).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_all_candidates_without_selection() {
        let root = TempDir::new().unwrap();
        let primary = root.path().join("primary");
        let fallback = root.path().join("fallback");
        fs::create_dir_all(&primary).unwrap();
        fs::create_dir_all(&fallback).unwrap();
        fs::write(primary.join("b.gltf"), "{}").unwrap();
        fs::write(primary.join("a.glb"), b"glTF1234").unwrap();
        fs::write(primary.join("a.bin"), b"\0").unwrap();
        fs::write(fallback.join("other.gltf"), "{}").unwrap();

        let dirs = DirectoryPriorityList::new(
            AssetDirectory::primary(&primary, "gltf").with_mount("model_gltf"),
            vec![AssetDirectory::fallback(&fallback, "test", "engine.gltf")],
        );
        let models = list_models(&dirs);

        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a.glb", "b.gltf", "other.gltf"]);
        assert_eq!(models[0].size, 8);
        assert_eq!(models[0].tag, "gltf");
        assert_eq!(models[0].path, "/model_gltf/a.glb");
        assert_eq!(models[2].tag, "test");
        assert_eq!(models[2].path, CURRENT_MODEL_ENDPOINT);
        assert!(models[0].last_modified.as_deref().is_some_and(|t| t.ends_with('Z')));
    }

    #[test]
    fn test_missing_directories_give_empty_list() {
        let root = TempDir::new().unwrap();
        let dirs = DirectoryPriorityList::new(
            AssetDirectory::primary(root.path().join("nope"), "gltf"),
            vec![],
        );
        assert!(list_models(&dirs).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let entry = ModelEntry {
            name: "a.glb".into(),
            tag: "gltf".into(),
            size: 3,
            path: "/api/model".into(),
            last_modified: Some(rfc3339(SystemTime::UNIX_EPOCH)),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "a.glb",
                "type": "gltf",
                "size": 3,
                "path": "/api/model",
                "lastModified": "1970-01-01T00:00:00Z"
            })
        );
    }
}
