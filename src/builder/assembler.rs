//! Session assembly: sub-builds in, target list out.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::engine::BuildEngine;
use crate::builder::session::{GroupContext, SessionState, SubBuild};
use crate::builder::toolchain::{SessionProfile, Toolchain};
use crate::core::environment::BuildEnvironment;
use crate::core::feature::{DependencyExpr, FeatureDenylist, FeatureGate};
use crate::core::group::{GroupOptions, OptionKind, SourceSpec};
use crate::core::registry::GroupRegistry;
use crate::core::target::{ObjectHandle, PruneOutcome, TargetList};
use crate::util::config::Config;
use crate::util::fs::canonical_dir;
use crate::util::paths;

/// Owns one build session's environment, registry and engine.
///
/// Construct one assembler per session. Preparing the same assembler twice
/// appends the session profile twice; nothing guards against it.
pub struct BuildAssembler<E> {
    engine: E,
    gate: FeatureGate,
    toolchain: Toolchain,
    profile: SessionProfile,
    env: BuildEnvironment,
    registry: GroupRegistry,
    defined: BTreeSet<String>,
    root: Option<PathBuf>,
    state: SessionState,
}

impl<E: BuildEngine> BuildAssembler<E> {
    /// Create an assembler with the default toolchain and session profile.
    pub fn new(engine: E, gate: FeatureGate) -> Self {
        BuildAssembler {
            engine,
            gate,
            toolchain: Toolchain::default(),
            profile: SessionProfile::default(),
            env: BuildEnvironment::new(),
            registry: GroupRegistry::new(),
            defined: BTreeSet::new(),
            root: None,
            state: SessionState::Unprepared,
        }
    }

    /// Create an assembler configured from a loaded [`Config`].
    pub fn from_config(engine: E, config: &Config) -> Self {
        let denylist = match &config.features.unsupported {
            Some(tokens) => FeatureDenylist::new(tokens.iter().cloned()),
            None => FeatureDenylist::default(),
        };

        Self::new(engine, FeatureGate::new(denylist))
            .with_toolchain(Toolchain::from_config(config), SessionProfile::from_config(config))
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain, profile: SessionProfile) -> Self {
        self.toolchain = toolchain;
        self.profile = profile;
        self
    }

    pub fn env(&self) -> &BuildEnvironment {
        &self.env
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn gate(&self) -> &FeatureGate {
        &self.gate
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Session root, once prepared.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Mark an option token as defined for this session.
    pub fn add_depend(&mut self, option: impl Into<String>) {
        self.defined.insert(option.into());
    }

    pub fn is_defined(&self, option: &str) -> bool {
        self.defined.contains(option)
    }

    fn context(&mut self, current_dir: PathBuf, variant_dir: PathBuf) -> GroupContext<'_> {
        GroupContext {
            gate: &self.gate,
            env: &mut self.env,
            registry: &mut self.registry,
            engine: &mut self.engine,
            defined: &mut self.defined,
            current_dir,
            variant_dir,
        }
    }

    /// Declare a group directly against this session.
    ///
    /// Relative sources resolve against the session root, or the working
    /// directory before the session is prepared. Objects go under `build/`.
    pub fn declare_group(
        &mut self,
        name: &str,
        sources: SourceSpec,
        depend: DependencyExpr,
        options: GroupOptions,
    ) -> Result<Vec<ObjectHandle>> {
        let base = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("failed to read current directory")?,
        };
        let variant_dir = base.join("build");

        self.context(base, variant_dir)
            .declare_group(name, sources, depend, options)
    }

    /// Run every sub-build under `root` and apply the session profile.
    ///
    /// Each sub-build's fragment becomes one nested entry of the returned
    /// list, in order.
    pub fn prepare_session(
        &mut self,
        root: &Path,
        sub_builds: &[Box<dyn SubBuild>],
    ) -> Result<TargetList> {
        let root = canonical_dir(root)?;

        if self.state == SessionState::Prepared {
            tracing::warn!(
                "session already prepared; session flags will be applied again"
            );
        }

        tracing::info!("Preparing session at {}", root.display());
        self.root = Some(root.clone());

        let mut targets = TargetList::new();
        for sub in sub_builds {
            let current_dir = root.join(sub.source_dir());
            let variant_dir = root.join(sub.variant_dir());
            tracing::debug!(
                "sub-build `{}`: {} -> {}",
                sub.name(),
                current_dir.display(),
                variant_dir.display()
            );

            let mut ctx = self.context(current_dir, variant_dir);
            let fragment = sub
                .build(&mut ctx)
                .with_context(|| format!("sub-build `{}` failed", sub.name()))?;
            targets.push_nested(fragment);
        }

        self.apply_profile(&root);
        self.state = SessionState::Prepared;

        Ok(targets)
    }

    fn apply_profile(&mut self, root: &Path) {
        let library_dir = self.profile.library_dir_for(&self.toolchain);
        if library_dir == self.profile.legacy_library_dir {
            tracing::info!("Using legacy library directory for toolchain {}", self.toolchain.family);
        }

        self.env
            .append_libraries(self.profile.libraries.iter().cloned());
        self.env
            .append_library_path(paths::normalize(root.join(library_dir)));
        self.env
            .append(OptionKind::CompileFlags, self.profile.compile_flags.iter().cloned());
        self.env
            .append(OptionKind::LinkFlags, self.profile.link_flags.iter().cloned());
    }

    /// Remove the first object, depth-first, whose path contains `fragment`.
    pub fn prune_by_fragment(&self, targets: &mut TargetList, fragment: &str) -> PruneOutcome {
        let outcome = targets.prune_by_fragment(fragment);
        match &outcome {
            PruneOutcome::Removed(handle) => tracing::debug!("pruned {}", handle),
            PruneOutcome::NotFound => tracing::debug!("no object matches `{}`", fragment),
        }
        outcome
    }

    /// Log a summary of the assembled session.
    pub fn end_building(&self, targets: &TargetList) {
        tracing::info!(
            "Assembled {} groups ({} sources) into {} objects",
            self.registry.len(),
            self.registry.source_count(),
            targets.object_count()
        );
    }

    /// Path of `path` relative to the session root.
    pub fn relative_to_root(&self, path: &Path) -> String {
        match &self.root {
            Some(root) => paths::relative_path(root, path),
            None => paths::normalize(path),
        }
    }
}
