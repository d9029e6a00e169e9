//! `buildgroup depend` command

use anyhow::{Context, Result};

use crate::cli::DependArgs;
use buildgroup::core::{DependencyExpr, FeatureDenylist, FeatureGate};

pub fn execute(args: DependArgs) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let config = super::config_for(&dir);

    let denylist = match config.features.unsupported {
        Some(tokens) => FeatureDenylist::new(tokens),
        None => FeatureDenylist::default(),
    };
    let gate = FeatureGate::new(denylist);

    let mut tokens = args.tokens;
    let depend = if tokens.len() == 1 {
        DependencyExpr::Single(tokens.remove(0))
    } else {
        DependencyExpr::Many(tokens)
    };

    match gate.rejected_by(&depend) {
        None => println!("supported: {}", depend),
        Some(token) => println!("unsupported: {} (rejected by {})", depend, token),
    }

    Ok(())
}
