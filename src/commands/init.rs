use anyhow::{Context, Result};
use clap::Command;
use std::{fs, io::Write};
use tracing::info;

use crate::config::Config;

pub fn get_init_command() -> Command {
    Command::new("init").about("Create an empty Vit object store")
}

pub fn init<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let path_to_vit = &config.vit_dir;

    if config.is_initialized() {
        writeln!(out, "Vit repository already initialized!")?;
        return Ok(());
    }

    // Create Required Directories
    for dir in [config.objects_dir(), path_to_vit.join("refs")] {
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    // Create Required Files
    let head = path_to_vit.join("HEAD");
    fs::write(&head, "ref: refs/heads/main\n")
        .with_context(|| format!("writing {}", head.display()))?;

    info!(path = %path_to_vit.display(), "initialized repository");
    writeln!(out, "Initialized empty Vit repository in {}", path_to_vit.display())?;

    Ok(())
}
