//! Session assembly.
//!
//! This module turns sub-builds and their group declarations into a target
//! list, accumulating the build environment along the way.

pub mod assembler;
pub mod engine;
pub mod errors;
pub mod plan;
pub mod session;
pub mod toolchain;

pub use assembler::BuildAssembler;
pub use engine::{BuildEngine, CompileRequest, CompileStep, ObjectPlanner};
pub use errors::AssemblyError;
pub use plan::AssemblyPlan;
pub use session::{GroupContext, SessionState, SubBuild};
pub use toolchain::{SessionProfile, Toolchain, ToolchainFamily};
