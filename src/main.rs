use anyhow::{Context, Result};
use colored::Colorize;
use std::{io, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;
use vit_plumbing::cli;
use vit_plumbing::commands::{CatMode, cat_file, hash_object, init, ls_tree, write_tree};
use vit_plumbing::config::Config;

fn main() -> ExitCode {
    let matches = cli().get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let config = Config::from_matches(matches)?;
    let mut out = io::stdout().lock();

    match matches.subcommand() {
        Some(("init", _sub_matches)) => init(&config, &mut out),
        Some(("hash-object", sub_matches)) => {
            let file = sub_matches
                .get_one::<PathBuf>("file")
                .context("missing <file> argument")?;

            hash_object(&config, file, sub_matches.get_flag("write"), &mut out)
        }
        Some(("cat-file", sub_matches)) => {
            let mode = if sub_matches.get_flag("kind") {
                CatMode::Kind
            } else if sub_matches.get_flag("size") {
                CatMode::Size
            } else {
                CatMode::Print
            };
            let hash = sub_matches
                .get_one::<String>("hash")
                .context("missing <hash> argument")?;

            cat_file(&config, mode, hash, &mut out)
        }
        Some(("ls-tree", sub_matches)) => {
            let hash = sub_matches
                .get_one::<String>("hash")
                .context("missing <hash> argument")?;

            ls_tree(&config, hash, sub_matches.get_flag("name-only"), &mut out)
        }
        Some(("write-tree", _sub_matches)) => write_tree(&config, &mut out),
        _ => unreachable!("Unknown subcommand!"),
    }
}
