//! Init command handler

use std::io::Write;
use std::path::Path;

use crate::config::Config;

pub fn cmd_init<W: Write>(path: Option<&Path>, out: &mut W) -> anyhow::Result<()> {
    if Config::create_default_if_missing(path)? {
        writeln!(out, "Config file created. Edit config.toml and run again.")?;
    } else {
        writeln!(out, "Config file already exists, leaving it untouched.")?;
    }
    Ok(())
}
