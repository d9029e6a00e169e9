//! Core data model: groups, feature gating, environment, targets.

pub mod environment;
pub mod feature;
pub mod group;
pub mod manifest;
pub mod registry;
pub mod target;

pub use environment::BuildEnvironment;
pub use feature::{DependencyExpr, FeatureDenylist, FeatureGate};
pub use group::{BuildGroup, GroupOptions, OptionKind, SourceFile, SourceKind, SourceSpec};
pub use manifest::Manifest;
pub use registry::GroupRegistry;
pub use target::{ObjectHandle, PruneOutcome, Target, TargetList};
