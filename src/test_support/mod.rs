//! Test utilities and mocks for unit tests.
//!
//! Provides build engines that record or fail instead of planning real
//! objects, plus on-disk project fixtures.

pub mod fixtures;

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::engine::{BuildEngine, CompileRequest};
use crate::core::target::ObjectHandle;

pub use fixtures::*;

/// One call made to a [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub group: String,
    pub sources: Vec<PathBuf>,
    pub variant_dir: PathBuf,
    /// Compile flags visible to the engine at call time
    pub compile_flags: Vec<String>,
}

/// Engine that records every request and returns one `.o` per source.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    pub calls: Vec<RecordedCall>,
}

impl BuildEngine for RecordingEngine {
    fn compile(&mut self, request: &CompileRequest<'_>) -> Result<Vec<ObjectHandle>> {
        self.calls.push(RecordedCall {
            group: request.group.to_string(),
            sources: request.sources.iter().map(|s| s.path.clone()).collect(),
            variant_dir: request.variant_dir.to_path_buf(),
            compile_flags: request.env.compile_flags.clone(),
        });

        Ok(request
            .sources
            .iter()
            .map(|source| {
                let stem = source
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ObjectHandle::new(
                    source.path.clone(),
                    request.variant_dir.join(format!("{}.o", stem)),
                )
            })
            .collect())
    }
}

/// Engine whose every invocation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEngine;

impl BuildEngine for FailingEngine {
    fn compile(&mut self, _request: &CompileRequest<'_>) -> Result<Vec<ObjectHandle>> {
        bail!("compiler exploded")
    }
}
