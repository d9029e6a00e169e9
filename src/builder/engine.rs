//! The build-execution engine seam.
//!
//! Assembly never compiles anything itself. It hands each admitted group's
//! sources to a [`BuildEngine`] and keeps the object handles it returns.
//! [`ObjectPlanner`] is the default engine: it decides where every object
//! will live and records a compile step for later emission.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::errors::AssemblyError;
use crate::builder::toolchain::ToolchainFamily;
use crate::core::environment::BuildEnvironment;
use crate::core::group::{SourceFile, SourceKind};
use crate::core::target::ObjectHandle;

/// Everything an engine needs to turn one group into objects.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Name of the declaring group
    pub group: &'a str,
    /// Resolved sources, in declaration order
    pub sources: &'a [SourceFile],
    /// Session environment after this group's options were merged
    pub env: &'a BuildEnvironment,
    /// Directory the group's relative sources were resolved against
    pub source_dir: &'a Path,
    /// Directory objects of this sub-build are placed under
    pub variant_dir: &'a Path,
}

/// An external build-execution engine.
pub trait BuildEngine {
    /// Produce object handles for the request's sources.
    fn compile(&mut self, request: &CompileRequest<'_>) -> Result<Vec<ObjectHandle>>;
}

/// A single planned compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStep {
    /// Source file
    pub source: PathBuf,

    /// Output object file
    pub output: PathBuf,

    /// Group this belongs to
    pub group: String,

    /// Source kind
    pub kind: SourceKind,
}

impl CompileStep {
    /// Compiler arguments for this step under the given environment.
    pub fn arguments(&self, family: ToolchainFamily, env: &BuildEnvironment) -> Vec<String> {
        let mut args = Vec::new();
        match family {
            ToolchainFamily::Msvc => {
                args.push("cl.exe".to_string());
                args.push("/nologo".to_string());
                args.push("/c".to_string());
                args.push(self.source.display().to_string());
                args.push(format!("/Fo{}", self.output.display()));
                args.extend(env.include_paths.iter().map(|p| format!("/I{}", p)));
                args.extend(env.macro_definitions.iter().map(|d| format!("/D{}", d)));
            }
            ToolchainFamily::Gcc => {
                args.push("cc".to_string());
                args.push("-c".to_string());
                args.push(self.source.display().to_string());
                args.push("-o".to_string());
                args.push(self.output.display().to_string());
                args.extend(env.include_paths.iter().map(|p| format!("-I{}", p)));
                args.extend(env.define_flags());
            }
        }
        args.extend(env.compile_flags.iter().cloned());
        args
    }
}

/// Default engine mapping sources to object paths under the variant dir.
#[derive(Debug, Clone, Default)]
pub struct ObjectPlanner {
    family: ToolchainFamily,
    steps: Vec<CompileStep>,
}

impl ObjectPlanner {
    pub fn new(family: ToolchainFamily) -> Self {
        ObjectPlanner {
            family,
            steps: Vec::new(),
        }
    }

    pub fn family(&self) -> ToolchainFamily {
        self.family
    }

    /// Every compile step planned so far, in declaration order.
    pub fn steps(&self) -> &[CompileStep] {
        &self.steps
    }

    fn object_path(&self, request: &CompileRequest<'_>, source: &Path) -> Result<PathBuf> {
        let relative = match source.strip_prefix(request.source_dir) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => source
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| AssemblyError::Engine {
                    group: request.group.to_string(),
                    message: format!("source has no file name: {}", source.display()),
                })?,
        };

        Ok(request
            .variant_dir
            .join(relative)
            .with_extension(self.family.object_extension()))
    }
}

impl BuildEngine for ObjectPlanner {
    fn compile(&mut self, request: &CompileRequest<'_>) -> Result<Vec<ObjectHandle>> {
        let mut handles = Vec::new();

        for source in request.sources {
            if !source.kind.is_compilable() {
                tracing::debug!(
                    "{}: no object for {}",
                    request.group,
                    source.path.display()
                );
                continue;
            }

            let output = self.object_path(request, &source.path)?;
            self.steps.push(CompileStep {
                source: source.path.clone(),
                output: output.clone(),
                group: request.group.to_string(),
                kind: source.kind,
            });
            handles.push(ObjectHandle::new(source.path.clone(), output));
        }

        Ok(handles)
    }
}
