//! Hard failures of a configuration pass.
//!
//! Rejected groups, diverging path roots and unmatched prune fragments are
//! ordinary return values. Everything here aborts the whole pass.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

#[derive(Debug, Error, MietteDiagnostic)]
pub enum AssemblyError {
    #[error("source file not found: {}", path.display())]
    #[diagnostic(code(buildgroup::group::missing_source))]
    MissingSource { path: PathBuf },

    #[error("invalid source pattern `{pattern}`")]
    #[diagnostic(code(buildgroup::group::invalid_pattern))]
    InvalidPattern { pattern: String },

    #[error("source pattern `{pattern}` matched no source files")]
    #[diagnostic(code(buildgroup::group::empty_pattern))]
    EmptyPattern { pattern: String },

    #[error("build engine failed on group `{group}`: {message}")]
    #[diagnostic(code(buildgroup::engine::failed))]
    Engine { group: String, message: String },

    #[error("session root is not a directory: {}", root.display())]
    #[diagnostic(code(buildgroup::session::invalid_root))]
    InvalidRoot { root: PathBuf },

    #[error("no manifest found in {}", dir.display())]
    #[diagnostic(
        code(buildgroup::manifest::not_found),
        help("create a Groups.toml or pass --manifest")
    )]
    ManifestNotFound { dir: PathBuf },
}

impl AssemblyError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            AssemblyError::MissingSource { path } => diag
                .with_location(path.clone())
                .with_suggestion(suggestions::CHECK_SOURCES),
            AssemblyError::InvalidPattern { .. } | AssemblyError::EmptyPattern { .. } => {
                diag.with_suggestion(suggestions::CHECK_SOURCES)
            }
            AssemblyError::Engine { .. } => diag.with_suggestion(suggestions::VERBOSE),
            AssemblyError::InvalidRoot { root } => diag.with_location(root.clone()),
            AssemblyError::ManifestNotFound { .. } => diag.with_suggestion(suggestions::NO_MANIFEST),
        }
    }
}
