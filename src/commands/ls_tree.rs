use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::io::Write;

use crate::{
    config::Config,
    utils::{self, ObjectId},
};

pub fn get_ls_tree_command() -> Command {
    Command::new("ls-tree")
        .about("List the entries of a tree object")
        .arg(
            Arg::new("name-only")
                .long("name-only")
                .action(ArgAction::SetTrue)
                .help("List only file names"),
        )
        .arg(Arg::new("hash").required(true).help("Tree hash"))
        .arg_required_else_help(true)
}

pub fn ls_tree<W: Write>(config: &Config, hash: &str, name_only: bool, out: &mut W) -> Result<()> {
    let store = config.open_store()?;
    let id: ObjectId = hash.parse()?;

    let mut entries = utils::read_tree(&store, &id).with_context(|| format!("reading tree {hash}"))?;
    utils::sort_entries(&mut entries);

    for entry in &entries {
        writeln!(out, "{}", entry.format(name_only))?;
    }

    Ok(())
}
