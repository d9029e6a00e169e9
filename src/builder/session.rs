//! Group declaration and sub-builds.
//!
//! A [`GroupContext`] is what a sub-build script sees while it runs: it can
//! declare groups, mark options as defined and ask where it lives. The
//! context borrows the session's environment and registry explicitly, so
//! nothing here is process-global.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::engine::{BuildEngine, CompileRequest};
use crate::builder::errors::AssemblyError;
use crate::core::environment::BuildEnvironment;
use crate::core::feature::{DependencyExpr, FeatureGate};
use crate::core::group::{BuildGroup, GroupOptions, SourceSpec};
use crate::core::manifest::SubBuildSpec;
use crate::core::registry::GroupRegistry;
use crate::core::target::{ObjectHandle, TargetList};

/// Lifecycle of a build session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unprepared,
    Prepared,
}

/// Declaration surface handed to sub-builds.
pub struct GroupContext<'a> {
    pub(crate) gate: &'a FeatureGate,
    pub(crate) env: &'a mut BuildEnvironment,
    pub(crate) registry: &'a mut GroupRegistry,
    pub(crate) engine: &'a mut dyn BuildEngine,
    pub(crate) defined: &'a mut BTreeSet<String>,
    pub(crate) current_dir: PathBuf,
    pub(crate) variant_dir: PathBuf,
}

impl GroupContext<'_> {
    /// Directory relative sources are resolved against.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Directory objects are placed under.
    pub fn variant_dir(&self) -> &Path {
        &self.variant_dir
    }

    /// Mark an option token as defined for this session.
    pub fn add_depend(&mut self, option: impl Into<String>) {
        self.defined.insert(option.into());
    }

    pub fn is_defined(&self, option: &str) -> bool {
        self.defined.contains(option)
    }

    /// Declare a group and return the objects built from its sources.
    ///
    /// A group whose dependency expression is not supported yields no
    /// objects and leaves the environment, registry and engine untouched.
    pub fn declare_group(
        &mut self,
        name: &str,
        sources: SourceSpec,
        depend: DependencyExpr,
        options: GroupOptions,
    ) -> Result<Vec<ObjectHandle>> {
        if let Some(denied) = self.gate.rejected_by(&depend) {
            tracing::debug!("skipping group `{}`: {} is not supported", name, denied);
            return Ok(Vec::new());
        }

        let sources = sources
            .resolve(&self.current_dir)
            .with_context(|| format!("failed to resolve sources of group `{}`", name))?;

        let group = self.registry.record(BuildGroup {
            name: name.to_string(),
            sources,
            depend,
            options,
        });

        for key in group.options.passthrough_keys() {
            tracing::debug!("group `{}`: option `{}` is not merged", name, key);
        }
        self.env.merge_group(group);

        let request = CompileRequest {
            group: &group.name,
            sources: &group.sources,
            env: &*self.env,
            source_dir: &self.current_dir,
            variant_dir: &self.variant_dir,
        };

        let handles = self
            .engine
            .compile(&request)
            .map_err(|e| AssemblyError::Engine {
                group: name.to_string(),
                message: format!("{:#}", e),
            })?;

        tracing::debug!("group `{}`: {} objects", name, handles.len());
        Ok(handles)
    }
}

/// An external unit contributing one fragment to the session's target list.
pub trait SubBuild {
    fn name(&self) -> &str;

    /// Directory, relative to the session root, the sub-build declares from.
    fn source_dir(&self) -> &Path;

    /// Designated output directory, relative to the session root.
    fn variant_dir(&self) -> &Path;

    /// Declare this sub-build's groups and return their objects.
    fn build(&self, ctx: &mut GroupContext<'_>) -> Result<TargetList>;
}

impl SubBuild for SubBuildSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_dir(&self) -> &Path {
        &self.dir
    }

    fn variant_dir(&self) -> &Path {
        &self.variant_dir
    }

    fn build(&self, ctx: &mut GroupContext<'_>) -> Result<TargetList> {
        for option in &self.define {
            ctx.add_depend(option.clone());
        }

        let mut fragment = TargetList::new();
        for group in &self.groups {
            let handles = ctx.declare_group(
                &group.name,
                SourceSpec::Paths(group.src.clone()),
                group.depend.clone(),
                group.options.clone(),
            )?;
            fragment.extend(handles);
        }
        Ok(fragment)
    }
}
