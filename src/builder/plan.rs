//! Assembly plan emission.
//!
//! An [`AssemblyPlan`] is the serializable result of a prepared session: the
//! final environment, the admitted groups and the surviving objects. Paths
//! are written relative to the session root so plans from different
//! checkouts compare equal.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::builder::assembler::BuildAssembler;
use crate::builder::engine::{BuildEngine, ObjectPlanner};
use crate::core::environment::BuildEnvironment;
use crate::core::feature::DependencyExpr;
use crate::core::group::GroupOptions;
use crate::core::target::TargetList;
use crate::util::fs::write_string;

/// A prepared session, ready to hand to a build engine.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyPlan {
    pub root: String,
    pub toolchain: String,
    pub environment: BuildEnvironment,
    pub groups: Vec<GroupSummary>,
    pub objects: Vec<PlannedObject>,
}

/// An admitted group with root-relative sources.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub depend: DependencyExpr,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "GroupOptions::is_empty")]
    pub options: GroupOptions,
}

/// One object of the final target list.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedObject {
    pub source: String,
    pub output: String,
}

impl AssemblyPlan {
    /// Build the plan for a prepared session and its (possibly pruned) targets.
    pub fn new<E: BuildEngine>(asm: &BuildAssembler<E>, targets: &TargetList) -> Self {
        let root = asm
            .root()
            .map(|r| r.display().to_string())
            .unwrap_or_default();

        let groups = asm
            .registry()
            .groups()
            .iter()
            .map(|group| GroupSummary {
                name: group.name.clone(),
                depend: group.depend.clone(),
                sources: group
                    .sources
                    .iter()
                    .map(|s| asm.relative_to_root(&s.path))
                    .collect(),
                options: group.options.clone(),
            })
            .collect();

        let objects = targets
            .leaves()
            .into_iter()
            .map(|handle| PlannedObject {
                source: asm.relative_to_root(&handle.source),
                output: asm.relative_to_root(&handle.output),
            })
            .collect();

        AssemblyPlan {
            root,
            toolchain: asm.toolchain().family.to_string(),
            environment: asm.env().clone(),
            groups,
            objects,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for AssemblyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session root: {}", self.root)?;
        writeln!(f, "Groups ({}):", self.groups.len())?;
        for group in &self.groups {
            writeln!(f, "  {} [{} sources]", group.name, group.sources.len())?;
        }
        writeln!(f, "Objects ({}):", self.objects.len())?;
        for object in &self.objects {
            writeln!(f, "  {}", object.output)?;
        }
        writeln!(f, "Library paths:")?;
        for path in &self.environment.library_paths {
            writeln!(f, "  {}", path)?;
        }
        Ok(())
    }
}

/// compile_commands.json entry.
#[derive(Debug, Serialize, Deserialize)]
struct CompileCommand {
    directory: String,
    file: String,
    arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

/// Emit compile_commands.json for the objects still present in `targets`.
///
/// A step is live when an object with the same source and output is still
/// in `targets`. Every command is rendered with the final session
/// environment.
pub fn emit_compile_commands(
    asm: &BuildAssembler<ObjectPlanner>,
    targets: &TargetList,
    path: &Path,
) -> Result<()> {
    let live: HashSet<(&PathBuf, &PathBuf)> = targets
        .leaves()
        .into_iter()
        .map(|h| (&h.source, &h.output))
        .collect();
    let directory = asm
        .root()
        .map(|r| r.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    let commands: Vec<CompileCommand> = asm
        .engine()
        .steps()
        .iter()
        .filter(|step| live.contains(&(&step.source, &step.output)))
        .map(|step| CompileCommand {
            directory: directory.clone(),
            file: step.source.display().to_string(),
            arguments: step.arguments(asm.engine().family(), asm.env()),
            output: Some(step.output.display().to_string()),
        })
        .collect();

    let json = serde_json::to_string_pretty(&commands)?;
    write_string(path, &json)?;

    tracing::info!("Wrote {} compile commands to {}", commands.len(), path.display());
    Ok(())
}
