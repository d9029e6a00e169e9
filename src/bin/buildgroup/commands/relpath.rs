//! `buildgroup relpath` command

use anyhow::Result;

use crate::cli::RelpathArgs;
use buildgroup::relative_path;

pub fn execute(args: RelpathArgs) -> Result<()> {
    println!("{}", relative_path(&args.origin, &args.dest));
    Ok(())
}
