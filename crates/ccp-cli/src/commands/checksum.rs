//! `ccp checksum` command implementation

use anyhow::{Context, Result};
use ccp_common::fileutil::{compute_file_checksum, ChecksumAlgorithm};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Print `<digest>  <path>` like the coreutils `*sum` tools
pub fn run(path: &Path, algorithm: ChecksumAlgorithm, out: &mut impl Write) -> Result<String> {
    let checksum = compute_file_checksum(path, algorithm)
        .with_context(|| format!("Failed to compute {} of {}", algorithm, path.display()))?;
    debug!(path = %path.display(), %algorithm, "Computed checksum");

    writeln!(out, "{}  {}", checksum, path.display())?;
    Ok(checksum)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        let mut out = Vec::new();
        let checksum = run(&path, ChecksumAlgorithm::Sha256, &mut out).unwrap();
        assert_eq!(checksum, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
        assert!(String::from_utf8(out).unwrap().starts_with(&checksum));
    }
}
