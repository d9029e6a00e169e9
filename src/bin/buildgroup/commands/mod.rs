//! Command implementations

pub mod completions;
pub mod depend;
pub mod plan;
pub mod relpath;

use std::path::Path;

use buildgroup::util::config::{global_config_path, load_config, project_config_path, Config};

/// Load the merged global and project configuration for `project_root`.
pub fn config_for(project_root: &Path) -> Config {
    let global = global_config_path();
    load_config(global.as_deref(), &project_config_path(project_root))
}
