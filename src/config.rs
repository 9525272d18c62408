use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::{
    env,
    ffi::OsString,
    path::PathBuf,
};

use crate::utils::{ObjectStore, ZlibCodec};

pub const DEFAULT_VIT_DIR: &str = ".vit";
pub const DEFAULT_COMPRESSION: u32 = 6;

/// Settings shared by every command, resolved once from the global flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub vit_dir: PathBuf,
    pub compression: u32,
}

impl Config {
    /// Registers the global `--vit-dir`, `--compression` and `--verbose` flags.
    pub fn add_global_args(command: Command) -> Command {
        command
            .arg(
                Arg::new("vit-dir")
                    .long("vit-dir")
                    .global(true)
                    .env("VIT_DIR")
                    .value_name("PATH")
                    .value_parser(value_parser!(PathBuf))
                    .help("Path of the repository directory [default: ./.vit]"),
            )
            .arg(
                Arg::new("compression")
                    .long("compression")
                    .global(true)
                    .env("VIT_COMPRESSION")
                    .value_name("LEVEL")
                    .value_parser(value_parser!(u32).range(0..=9))
                    .help(format!("zlib level used for new objects [default: {DEFAULT_COMPRESSION}]")),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Log debug output to stderr"),
            )
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let vit_dir = match matches.get_one::<PathBuf>("vit-dir") {
            Some(dir) => dir.clone(),
            None => env::current_dir()?.join(DEFAULT_VIT_DIR),
        };
        let compression = matches
            .get_one::<u32>("compression")
            .copied()
            .unwrap_or(DEFAULT_COMPRESSION);

        Ok(Config {
            vit_dir,
            compression,
        })
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.vit_dir.join("objects")
    }

    /// The directory `write-tree` snapshots: the one holding the vit dir.
    pub fn work_tree(&self) -> PathBuf {
        match self.vit_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Name the tree builder skips so the store never snapshots itself.
    pub fn store_dir_name(&self) -> OsString {
        self.vit_dir
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from(DEFAULT_VIT_DIR))
    }

    /// Opens the object store, failing if `init` has not been run.
    pub fn open_store(&self) -> Result<ObjectStore> {
        let objects_dir = self.objects_dir();
        if !objects_dir.is_dir() {
            bail!(
                "Vit repository not initialized at {} (run `vit init`)",
                self.vit_dir.display()
            );
        }

        Ok(ObjectStore::with_codec(objects_dir, ZlibCodec::new(self.compression)))
    }

    pub fn is_initialized(&self) -> bool {
        self.objects_dir().is_dir()
    }
}
