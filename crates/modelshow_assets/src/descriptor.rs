//! # Reference Rewriter
//!
//! glTF descriptors name their buffers with URIs relative to the descriptor
//! file. The viewer fetches the descriptor from `/api/model`, so those
//! relative URIs would resolve against `/api/`. The rewriter turns every
//! `.bin` buffer URI into `/<prefix>/<uri>`, a path the buffer routes serve.
//!
//! Only the touched subset of the format is typed ([`GltfDescriptor`] and
//! [`BufferEntry`]). Everything else rides along in flattened maps, so
//! extension fields survive untouched. Typed members serialize first:
//! `buffers` leads the document and `uri` leads each buffer entry. The
//! remaining members keep their relative order.
//!
//! URIs that are already rooted, absolute URLs, and `data:` URIs are never
//! rewritten. Feeding rewritten output back in is therefore a no-op.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AssetError, AssetResult};
use crate::{has_extension, BUFFER_EXTENSION};

/// The part of a glTF document the rewriter works on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GltfDescriptor {
    /// Declared buffers. Absent in documents without geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffers: Option<Vec<BufferEntry>>,
    /// Every other top-level member, verbatim.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// One entry of `buffers`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BufferEntry {
    /// Buffer location. Absent for the GLB-stored buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// `byteLength`, `name`, `extensions`, `extras`, ...
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl BufferEntry {
    /// Returns the rewritten URI if this entry points at a relative `.bin`.
    fn rewritten_uri(&self, prefix: &str) -> Option<String> {
        let uri = self.uri.as_deref()?;
        if !has_extension(uri, BUFFER_EXTENSION) || is_server_addressable(uri) {
            return None;
        }
        let relative = uri.trim_start_matches("./");
        if prefix.is_empty() {
            Some(format!("/{relative}"))
        } else {
            Some(format!("/{prefix}/{relative}"))
        }
    }
}

/// Rooted paths, absolute URLs and inline data already resolve on their own.
fn is_server_addressable(uri: &str) -> bool {
    uri.starts_with('/') || uri.contains("://") || uri.starts_with("data:")
}

/// A rewritten descriptor, ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewrittenDescriptor {
    /// Serialized JSON text.
    pub text: String,
    /// Number of buffer references that were rewritten.
    pub rewritten: usize,
}

impl RewrittenDescriptor {
    /// Byte length of the text, for `Content-Length`.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

/// Rewrites buffer references under a fixed URL prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRewriter {
    prefix: String,
}

impl ReferenceRewriter {
    /// Creates a rewriter targeting `/<prefix>/`. Surrounding slashes are
    /// ignored.
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: prefix.as_ref().trim_matches('/').to_string(),
        }
    }

    /// The prefix, without slashes.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Rewrites a parsed descriptor in place and returns how many references
    /// changed.
    pub fn apply(&self, descriptor: &mut GltfDescriptor) -> usize {
        let Some(buffers) = descriptor.buffers.as_mut() else {
            return 0;
        };
        let mut rewritten = 0;
        for buffer in buffers.iter_mut() {
            if let Some(uri) = buffer.rewritten_uri(&self.prefix) {
                buffer.uri = Some(uri);
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Parses, rewrites and re-serializes descriptor text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is not a glTF object whose
    /// `buffers` match the expected shape.
    pub fn rewrite(&self, text: &str) -> serde_json::Result<RewrittenDescriptor> {
        let mut descriptor: GltfDescriptor = serde_json::from_str(text)?;
        let rewritten = self.apply(&mut descriptor);
        Ok(RewrittenDescriptor {
            text: serde_json::to_string(&descriptor)?,
            rewritten,
        })
    }

    /// Reads a descriptor from disk and rewrites it. The file is not modified.
    ///
    /// # Errors
    ///
    /// [`AssetError::Io`] if the file cannot be read, [`AssetError::Parse`] if
    /// it is not valid descriptor JSON.
    pub fn rewrite_file(&self, path: &Path) -> AssetResult<RewrittenDescriptor> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        self.rewrite(&text).map_err(|source| AssetError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uris(text: &str) -> Vec<Option<String>> {
        let doc: Value = serde_json::from_str(text).unwrap();
        doc["buffers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b.get("uri").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_rewrites_relative_bin_uris() {
        let rewriter = ReferenceRewriter::new("primary");
        let out = rewriter
            .rewrite(r#"{"buffers":[{"byteLength":4,"uri":"scene.bin"}]}"#)
            .unwrap();
        assert_eq!(out.rewritten, 1);
        assert_eq!(uris(&out.text), vec![Some("/primary/scene.bin".to_string())]);
    }

    #[test]
    fn test_rewrite_counts_and_preserves_other_fields() {
        let source = json!({
            "asset": {"version": "2.0", "generator": "test"},
            "buffers": [
                {"byteLength": 12, "uri": "a.bin"},
                {"byteLength": 24, "uri": "gltf_buffer_7.bin", "extras": {"k": [1, 2.5]}},
                {"byteLength": 8, "uri": "data:application/octet-stream;base64,AAAA"},
                {"byteLength": 8}
            ],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
            "extensionsUsed": ["KHR_materials_unlit"],
            "extras": {"scale": 0.1}
        });
        let out = ReferenceRewriter::new("model_gltf")
            .rewrite(&source.to_string())
            .unwrap();
        assert_eq!(out.rewritten, 2);

        let mut result: Value = serde_json::from_str(&out.text).unwrap();
        assert_eq!(result["buffers"][0]["uri"], "/model_gltf/a.bin");
        assert_eq!(result["buffers"][1]["uri"], "/model_gltf/gltf_buffer_7.bin");

        // Restore the two URIs; everything must then match the source.
        result["buffers"][0]["uri"] = json!("a.bin");
        result["buffers"][1]["uri"] = json!("gltf_buffer_7.bin");
        assert_eq!(result, source);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let rewriter = ReferenceRewriter::new("model_gltf");
        let once = rewriter
            .rewrite(r#"{"buffers":[{"uri":"a.bin"},{"uri":"b.bin"}]}"#)
            .unwrap();
        let twice = rewriter.rewrite(&once.text).unwrap();
        assert_eq!(twice.rewritten, 0);
        assert_eq!(twice.text, once.text);
    }

    #[test]
    fn test_skips_absolute_urls_and_other_extensions() {
        let out = ReferenceRewriter::new("p")
            .rewrite(
                r#"{"buffers":[{"uri":"https://cdn.example/a.bin"},{"uri":"mesh.dat"},{"uri":"UPPER.BIN"}]}"#,
            )
            .unwrap();
        assert_eq!(out.rewritten, 1);
        assert_eq!(
            uris(&out.text),
            vec![
                Some("https://cdn.example/a.bin".to_string()),
                Some("mesh.dat".to_string()),
                Some("/p/UPPER.BIN".to_string()),
            ]
        );
    }

    #[test]
    fn test_prefix_slashes_and_dot_segments_are_normalized() {
        let rewriter = ReferenceRewriter::new("/model_gltf/");
        assert_eq!(rewriter.prefix(), "model_gltf");
        let out = rewriter.rewrite(r#"{"buffers":[{"uri":"./a.bin"}]}"#).unwrap();
        assert_eq!(uris(&out.text), vec![Some("/model_gltf/a.bin".to_string())]);
    }

    #[test]
    fn test_typed_keys_lead_and_other_keys_keep_relative_order() {
        let text = r#"{"scene":0,"buffers":[{"byteLength":1,"uri":"x.bin"}],"asset":{"version":"2.0"}}"#;
        let out = ReferenceRewriter::new("p").rewrite(text).unwrap();
        assert_eq!(
            out.text,
            r#"{"buffers":[{"uri":"/p/x.bin","byteLength":1}],"scene":0,"asset":{"version":"2.0"}}"#
        );
    }

    #[test]
    fn test_document_without_buffers_round_trips() {
        let out = ReferenceRewriter::new("p")
            .rewrite(r#"{"asset":{"version":"2.0"},"buffers":[]}"#)
            .unwrap();
        assert_eq!(out.rewritten, 0);
        assert_eq!(out.text, r#"{"buffers":[],"asset":{"version":"2.0"}}"#);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let rewriter = ReferenceRewriter::new("p");
        assert!(rewriter.rewrite("{not json").is_err());
        assert!(rewriter.rewrite("[1, 2]").is_err());
        assert!(rewriter.rewrite(r#"{"buffers":{"uri":"a.bin"}}"#).is_err());
    }

    #[test]
    fn test_rewrite_file_maps_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("bad.gltf");
        fs::write(&bad, "{").unwrap();
        let rewriter = ReferenceRewriter::new("p");
        assert_eq!(rewriter.rewrite_file(&bad).unwrap_err().kind(), "parse_failure");
        assert_eq!(
            rewriter
                .rewrite_file(&dir.path().join("missing.gltf"))
                .unwrap_err()
                .kind(),
            "io_failure"
        );
    }
}
