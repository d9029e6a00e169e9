//! `buildgroup plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use buildgroup::builder::plan::emit_compile_commands;
use buildgroup::builder::{AssemblyPlan, BuildAssembler, ObjectPlanner, SubBuild, Toolchain};
use buildgroup::core::{Manifest, PruneOutcome};
use buildgroup::util::diagnostic::{emit, suggestions, Diagnostic};

pub fn execute(args: PlanArgs, color: bool) -> Result<()> {
    let manifest_path = match args.manifest {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            Manifest::find(&cwd)?
        }
    };
    let manifest = Manifest::load(&manifest_path)?;
    let declared = manifest.group_count();

    let root = match manifest_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir().context("failed to read current directory")?,
    };

    let config = super::config_for(&root);
    let toolchain = Toolchain::from_config(&config);
    let mut asm = BuildAssembler::from_config(ObjectPlanner::new(toolchain.family), &config);

    let sub_builds: Vec<Box<dyn SubBuild>> = manifest
        .sub_builds
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn SubBuild>)
        .collect();

    let mut targets = asm.prepare_session(&root, &sub_builds)?;

    for fragment in manifest.prune.iter().chain(&args.prune) {
        if let PruneOutcome::NotFound = asm.prune_by_fragment(&mut targets, fragment) {
            let diag = Diagnostic::warning(format!("no object matches `{}`", fragment))
                .with_context("the fragment is compared against object paths");
            emit(&diag, color);
        }
    }

    let rejected = declared.saturating_sub(asm.registry().len());
    if rejected > 0 {
        let diag = Diagnostic::note(format!(
            "{} of {} groups rejected by the feature denylist",
            rejected, declared
        ))
        .with_suggestion(suggestions::VERBOSE);
        emit(&diag, color);
    }

    asm.end_building(&targets);

    if args.emit_compile_commands {
        let root = asm.root().unwrap_or(root.as_path()).to_path_buf();
        emit_compile_commands(&asm, &targets, &root.join("compile_commands.json"))?;
    }

    let plan = AssemblyPlan::new(&asm, &targets);
    if args.json {
        println!("{}", plan.to_json()?);
    } else {
        print!("{}", plan);
    }

    Ok(())
}
