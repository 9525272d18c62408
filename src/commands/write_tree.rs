use anyhow::{Context, Result};
use clap::Command;
use std::io::Write;
use tracing::{info, warn};

use crate::{config::Config, utils::TreeBuilder};

pub fn get_write_tree_command() -> Command {
    Command::new("write-tree").about("Store the working directory as tree objects")
}

pub fn write_tree<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let store = config.open_store()?;
    let work_tree = config.work_tree();

    let root = TreeBuilder::new(&store, config.store_dir_name())
        .build(&work_tree)
        .with_context(|| format!("building tree for {}", work_tree.display()))?;

    match root {
        Some(tree) => {
            info!(id = %tree.id, "wrote root tree");
            writeln!(out, "{}", tree.id)?;
        }
        None => warn!("nothing to commit, working tree is empty"),
    }

    Ok(())
}
