//! # Server Configuration
//!
//! Everything the router needs, passed in at construction. Loaded from a
//! TOML file; every field has a default, so an empty file (or no file) gives
//! the stock layout:
//!
//! ```text
//! public/model_gltf/                       primary, mounted at /model_gltf
//! public/model_3dtiles/output_model/       fallback, expects coal3-1_7.gltf
//! public/model_gltf_test/                  fallback, expects 2CylinderEngine.gltf
//! dist/                                    SPA bundle
//! ```

use std::collections::HashSet;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use modelshow_assets::{AssetDirectory, AssetKind, DirectoryPriorityList};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Mount of the whole public root.
pub const PUBLIC_MOUNT: &str = "public";

/// URL segments reserved for the API.
const RESERVED_MOUNTS: [&str; 2] = ["api", PUBLIC_MOUNT];

/// Errors while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`].
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Values parse but make no sense together.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The primary model directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryDirConfig {
    /// Location on disk.
    pub path: PathBuf,
    /// URL segment it is served under. Rewritten buffer URIs point here.
    pub mount: String,
    /// Label in model listings.
    pub tag: String,
}

impl Default for PrimaryDirConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("public/model_gltf"),
            mount: "model_gltf".to_string(),
            tag: "gltf".to_string(),
        }
    }
}

/// A fallback model directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDirConfig {
    /// Location on disk.
    pub path: PathBuf,
    /// Label in model listings.
    #[serde(default = "default_fallback_tag")]
    pub tag: String,
    /// The one file probed when the primary directory is empty.
    pub expected_file: String,
    /// Optional URL segment for static access.
    #[serde(default)]
    pub mount: Option<String>,
}

fn default_fallback_tag() -> String {
    "fallback".to_string()
}

fn default_fallbacks() -> Vec<FallbackDirConfig> {
    vec![
        FallbackDirConfig {
            path: PathBuf::from("public/model_3dtiles/output_model"),
            tag: "3dtiles".to_string(),
            expected_file: "coal3-1_7.gltf".to_string(),
            mount: None,
        },
        FallbackDirConfig {
            path: PathBuf::from("public/model_gltf_test"),
            tag: "test".to_string(),
            expected_file: "2CylinderEngine.gltf".to_string(),
            mount: None,
        },
    ]
}

/// Logging options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `modelshow_server=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_address: IpAddr,
    /// TCP port to bind.
    pub port: u16,
    /// Identity reported by `/api/health`.
    pub server_name: String,
    /// Root served under `/public`.
    pub public_root: PathBuf,
    /// Prebuilt SPA bundle.
    pub dist_dir: PathBuf,
    /// Primary model directory.
    pub primary: PrimaryDirConfig,
    /// Fallback directories, in priority order.
    #[serde(rename = "fallback", default = "default_fallbacks")]
    pub fallbacks: Vec<FallbackDirConfig>,
    /// Logging.
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            server_name: "ModelShow API Server".to_string(),
            public_root: PathBuf::from("public"),
            dist_dir: PathBuf::from("dist"),
            primary: PrimaryDirConfig::default(),
            fallbacks: default_fallbacks(),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable, malformed, or fails
    /// [`ServerConfig::validate`].
    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Socket address to listen on.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Checks mounts and fallbacks.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for mount in self.mounts() {
            check_mount(mount)?;
            if !seen.insert(mount) {
                return Err(ConfigError::Invalid(format!("mount {mount:?} is used twice")));
            }
        }
        for fallback in &self.fallbacks {
            let file = fallback.expected_file.as_str();
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "fallback {} needs a plain expected_file, got {file:?}",
                    fallback.path.display()
                )));
            }
            if AssetKind::from_file_name(file).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "fallback {} expects {file:?}, which is not a .glb or .gltf model",
                    fallback.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Every directory mount, primary first.
    pub fn mounts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.mount.as_str())
            .chain(self.fallbacks.iter().filter_map(|f| f.mount.as_deref()))
    }

    /// The directory priority list used by the locator, resolver and catalog.
    #[must_use]
    pub fn directories(&self) -> DirectoryPriorityList {
        let primary = AssetDirectory::primary(&self.primary.path, &self.primary.tag)
            .with_mount(&self.primary.mount);
        let fallbacks = self
            .fallbacks
            .iter()
            .map(|f| {
                let dir = AssetDirectory::fallback(&f.path, &f.tag, &f.expected_file);
                match &f.mount {
                    Some(mount) => dir.with_mount(mount),
                    None => dir,
                }
            })
            .collect();
        DirectoryPriorityList::new(primary, fallbacks)
    }

    /// Path of the SPA entry page.
    #[must_use]
    pub fn index_html(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

fn check_mount(mount: &str) -> ConfigResult<()> {
    if mount.is_empty() || mount.contains(['/', '\\', '*', ':', '{', '}']) || mount.starts_with('.') {
        return Err(ConfigError::Invalid(format!(
            "mount {mount:?} must be a single URL segment"
        )));
    }
    if RESERVED_MOUNTS.contains(&mount) {
        return Err(ConfigError::Invalid(format!("mount {mount:?} is reserved")));
    }
    Ok(())
}
