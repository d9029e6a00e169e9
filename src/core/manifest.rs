//! Groups.toml session manifest.
//!
//! The manifest is the declarative form of a session's sub-build scripts:
//!
//! ```toml
//! prune = ["topwin"]
//!
//! [[subbuild]]
//! name = "components"
//! dir = "components"
//! variant-dir = "build/components"
//!
//! [[subbuild.group]]
//! name = "rtgui"
//! src = ["rtgui/common/*.c", "rtgui/server/topwin.c"]
//! depend = ["RT_USING_RTGUI"]
//! options = { include-paths = ["rtgui/include"] }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::builder::errors::AssemblyError;
use crate::core::feature::DependencyExpr;
use crate::core::group::GroupOptions;
use crate::util::fs::read_to_string;

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "Groups.toml";

/// A parsed session manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Object fragments pruned after the session is prepared
    #[serde(default)]
    pub prune: Vec<String>,

    /// Sub-builds, in execution order
    #[serde(default, rename = "subbuild")]
    pub sub_builds: Vec<SubBuildSpec>,
}

/// One sub-build script.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubBuildSpec {
    pub name: String,

    /// Directory relative to the session root
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Output directory relative to the session root (default `build/<name>`)
    #[serde(default)]
    pub variant_dir: PathBuf,

    /// Option tokens marked as defined while this sub-build runs
    #[serde(default)]
    pub define: Vec<String>,

    #[serde(default, rename = "group")]
    pub groups: Vec<GroupSpec>,
}

/// One group declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupSpec {
    pub name: String,

    /// Source paths or glob patterns relative to the sub-build directory
    #[serde(default)]
    pub src: Vec<String>,

    #[serde(default)]
    pub depend: DependencyExpr,

    #[serde(default)]
    pub options: GroupOptions,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Manifest {
    /// Parse a manifest from a string.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(contents)?;

        for sub in &mut manifest.sub_builds {
            if sub.variant_dir.as_os_str().is_empty() {
                sub.variant_dir = Path::new("build").join(&sub.name);
            }
        }

        Ok(manifest)
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Locate the manifest in `dir`.
    pub fn find(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_NAME);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AssemblyError::ManifestNotFound {
                dir: dir.to_path_buf(),
            }
            .into())
        }
    }

    /// Total number of declared groups.
    pub fn group_count(&self) -> usize {
        self.sub_builds.iter().map(|s| s.groups.len()).sum()
    }
}
