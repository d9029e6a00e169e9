//! Accumulated compiler and linker configuration for one build session.

use serde::Serialize;

use crate::core::group::{BuildGroup, OptionKind};

/// Global build configuration shared by every admitted group.
///
/// Every sequence is append-only and keeps duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    pub compile_flags: Vec<String>,
    pub include_paths: Vec<String>,
    pub macro_definitions: Vec<String>,
    pub link_flags: Vec<String>,
    pub library_paths: Vec<String>,
    /// Libraries linked into the final image
    pub libraries: Vec<String>,
}

impl BuildEnvironment {
    pub fn new() -> Self {
        BuildEnvironment::default()
    }

    fn sequence_mut(&mut self, kind: OptionKind) -> &mut Vec<String> {
        match kind {
            OptionKind::CompileFlags => &mut self.compile_flags,
            OptionKind::IncludePaths => &mut self.include_paths,
            OptionKind::MacroDefinitions => &mut self.macro_definitions,
            OptionKind::LinkFlags => &mut self.link_flags,
        }
    }

    pub fn sequence(&self, kind: OptionKind) -> &[String] {
        match kind {
            OptionKind::CompileFlags => &self.compile_flags,
            OptionKind::IncludePaths => &self.include_paths,
            OptionKind::MacroDefinitions => &self.macro_definitions,
            OptionKind::LinkFlags => &self.link_flags,
        }
    }

    /// Append values to the sequence for `kind`.
    pub fn append<I, S>(&mut self, kind: OptionKind, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequence_mut(kind)
            .extend(values.into_iter().map(Into::into));
    }

    /// Merge every recognized option of `group`.
    pub(crate) fn merge_group(&mut self, group: &BuildGroup) {
        for kind in OptionKind::ALL {
            if let Some(values) = group.options.kind(kind) {
                self.append(kind, values.iter().cloned());
            }
        }
    }

    pub fn append_library_path(&mut self, path: impl Into<String>) {
        self.library_paths.push(path.into());
    }

    pub fn append_libraries<I, S>(&mut self, libs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libraries.extend(libs.into_iter().map(Into::into));
    }

    /// Macro definitions rendered as compiler flags.
    pub fn define_flags(&self) -> Vec<String> {
        self.macro_definitions
            .iter()
            .map(|d| format!("-D{}", d))
            .collect()
    }
}
