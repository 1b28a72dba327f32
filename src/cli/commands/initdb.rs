//! Initdb command handler

use std::io::Write;

use crate::db::Store;

pub async fn cmd_initdb<W: Write>(store: &Store, drop: bool, out: &mut W) -> anyhow::Result<()> {
    store.initialize(drop).await?;
    writeln!(out, "Initialized database.")?;
    Ok(())
}
