//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.buildgroup/config.toml` - User-wide defaults
//! - Project: `.buildgroup/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::read_to_string;

/// buildgroup configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feature gating
    pub features: FeatureConfig,

    /// Toolchain selection
    pub toolchain: ToolchainSettings,

    /// Session profile overrides
    pub session: SessionConfig,
}

/// Feature gating configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Features this build profile does not support (replaces the default list)
    pub unsupported: Option<Vec<String>>,
}

/// Toolchain selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Toolchain family (msvc, gcc)
    pub family: Option<String>,

    /// Toolchain version, e.g. "6.0" or "14.3"
    pub version: Option<String>,
}

/// Overrides for the session profile applied by `prepare_session`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Platform libraries linked into the final image
    pub libraries: Option<Vec<String>>,

    /// Library search directory, relative to the session root
    pub library_dir: Option<String>,

    /// Library search directory used by the legacy toolchain
    pub legacy_library_dir: Option<String>,

    /// Toolchain version that selects the legacy library directory
    pub legacy_version: Option<String>,

    /// Session-wide compile flags
    pub compile_flags: Option<Vec<String>>,

    /// Session-wide link flags
    pub link_flags: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.features.unsupported.is_some() {
            self.features.unsupported = other.features.unsupported;
        }

        if other.toolchain.family.is_some() {
            self.toolchain.family = other.toolchain.family;
        }
        if other.toolchain.version.is_some() {
            self.toolchain.version = other.toolchain.version;
        }

        let session = other.session;
        if session.libraries.is_some() {
            self.session.libraries = session.libraries;
        }
        if session.library_dir.is_some() {
            self.session.library_dir = session.library_dir;
        }
        if session.legacy_library_dir.is_some() {
            self.session.legacy_library_dir = session.legacy_library_dir;
        }
        if session.legacy_version.is_some() {
            self.session.legacy_version = session.legacy_version;
        }
        if session.compile_flags.is_some() {
            self.session.compile_flags = session.compile_flags;
        }
        if session.link_flags.is_some() {
            self.session.link_flags = session.link_flags;
        }
    }
}

/// Get the global config directory (~/.buildgroup).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".buildgroup"))
}

/// Get the global config path (~/.buildgroup/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.buildgroup/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".buildgroup").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.buildgroup/config.toml)
/// 2. Global config (~/.buildgroup/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}
