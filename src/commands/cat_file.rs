use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgGroup, Command};
use std::io::Write;

use crate::{
    config::Config,
    utils::{self, Object, ObjectId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatMode {
    /// Pretty-print the payload.
    Print,
    /// Print the object kind.
    Kind,
    /// Print the body size.
    Size,
}

pub fn get_cat_file_command() -> Command {
    Command::new("cat-file")
        .about("Show the content, kind or size of an object")
        .arg(
            Arg::new("print")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Pretty-print the object's content"),
        )
        .arg(
            Arg::new("kind")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Show the object's kind"),
        )
        .arg(
            Arg::new("size")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Show the object's size"),
        )
        .group(
            ArgGroup::new("mode")
                .args(["print", "kind", "size"])
                .required(true),
        )
        .arg(Arg::new("hash").required(true).help("Object hash"))
        .arg_required_else_help(true)
}

pub fn cat_file<W: Write>(config: &Config, mode: CatMode, hash: &str, out: &mut W) -> Result<()> {
    let store = config.open_store()?;
    let id: ObjectId = hash.parse()?;
    let raw = store.read(&id).with_context(|| format!("reading object {hash}"))?;

    match mode {
        CatMode::Kind => {
            let (header, _) = utils::parse_header(&raw)?;
            writeln!(out, "{}", header.kind)?;
        }
        CatMode::Size => {
            let (header, _) = utils::parse_header(&raw)?;
            writeln!(out, "{}", header.size)?;
        }
        CatMode::Print => match Object::parse(&raw)? {
            // payload goes out verbatim, no newline appended
            Object::Blob(content) => out.write_all(&content)?,
            Object::Tree(mut entries) => {
                utils::sort_entries(&mut entries);
                for entry in &entries {
                    writeln!(out, "{}", entry.format(false))?;
                }
            }
        },
    }

    Ok(())
}
