//! buildgroup - conditional source-group assembly for native C builds
//!
//! This crate collects source files into named groups, admits or rejects
//! each group against a feature denylist, accumulates per-group compiler and
//! linker options into one build environment, and resolves portable relative
//! paths between source and build locations.

pub mod builder;
pub mod core;
pub mod util;

/// Test utilities and mocks for unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{AssemblyPlan, BuildAssembler, BuildEngine, ObjectPlanner, SubBuild};
pub use crate::core::{
    BuildEnvironment, BuildGroup, DependencyExpr, FeatureGate, GroupOptions, Manifest,
    ObjectHandle, PruneOutcome, SourceSpec, Target, TargetList,
};
pub use crate::util::paths::relative_path;
