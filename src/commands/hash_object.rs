use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use std::{io::Write, path::Path};

use crate::{config::Config, utils};

pub fn get_hash_object_command() -> Command {
    Command::new("hash-object")
        .about("Compute the blob id of a file, optionally storing it")
        .arg(
            Arg::new("write")
                .short('w')
                .action(ArgAction::SetTrue)
                .help("Write the blob into the object store"),
        )
        .arg(
            Arg::new("file")
                .required(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("File to hash"),
        )
        .arg_required_else_help(true)
}

/// Prints the hex id with no trailing newline.
pub fn hash_object<W: Write>(config: &Config, file: &Path, write: bool, out: &mut W) -> Result<()> {
    let entry = if write {
        let store = config.open_store()?;
        utils::write_blob_from_file(&store, file)
    } else {
        utils::hash_file(file)
    }
    .with_context(|| format!("hashing {}", file.display()))?;

    write!(out, "{}", entry.id)?;
    Ok(())
}
