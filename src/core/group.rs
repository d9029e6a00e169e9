//! Build groups: named bundles of sources sharing build options.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::errors::AssemblyError;
use crate::core::feature::DependencyExpr;
use crate::util::fs::glob_files;

/// Kind of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    C,
    Cxx,
    Assembly,
    Header,
    Other,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension() else {
            return SourceKind::Other;
        };

        match ext.to_string_lossy().as_ref() {
            "c" => SourceKind::C,
            // Uppercase .C is C++ on case-sensitive filesystems
            "C" | "cpp" | "cc" | "cxx" | "c++" | "CPP" | "CXX" => SourceKind::Cxx,
            "s" | "S" | "asm" => SourceKind::Assembly,
            "h" | "hpp" | "hh" | "hxx" => SourceKind::Header,
            _ => SourceKind::Other,
        }
    }

    /// Whether the build engine produces an object for this kind.
    pub fn is_compilable(&self) -> bool {
        matches!(self, SourceKind::C | SourceKind::Cxx | SourceKind::Assembly)
    }
}

/// A resolved, existing source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    /// Resolve `path` against `base` and check that it exists.
    pub fn resolve(base: &Path, path: impl AsRef<Path>) -> Result<Self> {
        let path = base.join(path.as_ref());
        if !path.is_file() {
            return Err(AssemblyError::MissingSource { path }.into());
        }

        Ok(SourceFile {
            kind: SourceKind::from_path(&path),
            path,
        })
    }
}

/// Sources as handed to a group declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Raw path strings or glob patterns, relative to the declaring directory
    Paths(Vec<String>),
    /// Already-resolved file references, used as-is
    Resolved(Vec<SourceFile>),
}

impl SourceSpec {
    /// Turn this spec into concrete file references.
    ///
    /// Plain paths must name existing files. An entry that is not an
    /// existing file but contains glob metacharacters expands to the
    /// matching files, sorted, and must match at least one.
    pub fn resolve(self, base: &Path) -> Result<Vec<SourceFile>> {
        match self {
            SourceSpec::Resolved(files) => Ok(files),
            SourceSpec::Paths(paths) => {
                let mut files = Vec::new();
                for entry in paths {
                    if is_glob_pattern(&entry) && !base.join(&entry).is_file() {
                        let matched = glob_files(base, std::slice::from_ref(&entry))?;
                        if matched.is_empty() {
                            return Err(AssemblyError::EmptyPattern { pattern: entry }.into());
                        }
                        for path in matched {
                            files.push(SourceFile {
                                kind: SourceKind::from_path(&path),
                                path,
                            });
                        }
                    } else {
                        files.push(SourceFile::resolve(base, &entry)?);
                    }
                }
                Ok(files)
            }
        }
    }
}

impl From<Vec<&str>> for SourceSpec {
    fn from(paths: Vec<&str>) -> Self {
        SourceSpec::Paths(paths.into_iter().map(str::to_string).collect())
    }
}

fn is_glob_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// A group option kind that is merged into the build environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionKind {
    CompileFlags,
    IncludePaths,
    MacroDefinitions,
    LinkFlags,
}

impl OptionKind {
    /// All recognized kinds, in merge order.
    pub const ALL: [OptionKind; 4] = [
        OptionKind::CompileFlags,
        OptionKind::IncludePaths,
        OptionKind::MacroDefinitions,
        OptionKind::LinkFlags,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OptionKind::CompileFlags => "compile-flags",
            OptionKind::IncludePaths => "include-paths",
            OptionKind::MacroDefinitions => "macro-definitions",
            OptionKind::LinkFlags => "link-flags",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| format!("unrecognized option kind `{}`", s))
    }
}

/// Per-group options keyed by option kind.
///
/// Keys are case-sensitive. Unrecognized keys are kept but never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupOptions {
    entries: BTreeMap<String, Vec<String>>,
}

impl GroupOptions {
    pub fn new() -> Self {
        GroupOptions::default()
    }

    /// Builder-style insert.
    pub fn with<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, values);
        self
    }

    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Values for a recognized kind, if present.
    pub fn kind(&self, kind: OptionKind) -> Option<&[String]> {
        self.get(kind.key())
    }

    /// Keys that are not a recognized [`OptionKind`].
    pub fn passthrough_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| key.parse::<OptionKind>().is_err())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One admitted group, as recorded in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildGroup {
    pub name: String,
    pub sources: Vec<SourceFile>,
    pub depend: DependencyExpr,
    pub options: GroupOptions,
}
