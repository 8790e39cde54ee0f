//! # ModelShow Assets
//!
//! Model resolution core for the ModelShow viewer server.
//!
//! ## Architecture
//!
//! ```text
//! GET /api/model ──► locator ──► AssetCandidate
//!                                   │
//!                     .glb ◄────────┴────────► .gltf ──► rewriter
//!
//! GET /…/x.bin ────► pattern ──► BufferResolver ──► directory/x.bin
//! ```
//!
//! - **Locator**: one "current" model per request, chosen purely from
//!   directory contents. `.glb` beats `.gltf` in the primary directory;
//!   fallback directories are probed for one fixed file each.
//! - **Rewriter**: buffer URIs of a `.gltf` descriptor become rooted paths the
//!   buffer routes understand. Rooted URIs are left alone, so rewriting is
//!   idempotent.
//! - **Resolver**: exact filename lookup across the ordered directory list.
//! - **Catalog**: every model file in every directory, no winner selection.
//!
//! Nothing here knows about HTTP. Every function reads the filesystem afresh;
//! there is no cache.
//!
//! ## Example
//!
//! ```rust,ignore
//! use modelshow_assets::{locate_current_model, AssetKind, DirectoryPriorityList};
//!
//! let dirs = DirectoryPriorityList::new(primary, fallbacks)?;
//! let candidate = locate_current_model(&dirs)?;
//! if candidate.kind == AssetKind::Descriptor {
//!     let rewritten = ReferenceRewriter::new("model_gltf").rewrite(&text)?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod descriptor;
pub mod directory;
pub mod error;
pub mod locator;
pub mod pattern;
pub mod resolver;

pub use catalog::{list_models, rfc3339, ModelEntry, CURRENT_MODEL_ENDPOINT};
pub use descriptor::{BufferEntry, GltfDescriptor, ReferenceRewriter, RewrittenDescriptor};
pub use directory::{AssetDirectory, DirectoryPriorityList, DirectoryRole};
pub use error::{AssetError, AssetResult};
pub use locator::{locate_current_model, AssetCandidate, AssetKind};
pub use pattern::{classify_request_path, BufferRequest, BufferTrigger};
pub use resolver::BufferResolver;

/// Extension of self-contained binary models.
pub const BINARY_EXTENSION: &str = "glb";

/// Extension of text (JSON) model descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "gltf";

/// Extension of companion binary buffers.
pub const BUFFER_EXTENSION: &str = "bin";

/// Filename token of id-named buffers (`gltf_buffer_<id>.bin`).
pub const BUFFER_ID_PREFIX: &str = "gltf_buffer_";

/// Returns true when `name` ends in `.{ext}`, ignoring ASCII case.
#[must_use]
pub fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len()
        && name
            .rsplit_once('.')
            .is_some_and(|(_, found)| found.eq_ignore_ascii_case(ext))
}
