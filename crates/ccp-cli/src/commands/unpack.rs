//! `ccp unpack` command implementation

use anyhow::{Context, Result};
use ccp_common::archive;
use std::io::Write;
use std::path::Path;

/// Extract the archive and list the written files
pub fn run(archive_path: &Path, dest: &Path, out: &mut impl Write) -> Result<usize> {
    let written = archive::unpack(archive_path, dest)
        .with_context(|| format!("Failed to unpack {}", archive_path.display()))?;

    for path in &written {
        writeln!(out, "{}", path.display())?;
    }
    out.flush()?;
    Ok(written.len())
}
