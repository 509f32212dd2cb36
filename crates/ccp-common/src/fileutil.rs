//! File utilities: gzip-transparent opening, checksums, line counting

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::io::LineIterator;
use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
            ChecksumAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

impl std::str::FromStr for ChecksumAlgorithm {
    type Err = crate::error::CcpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(ChecksumAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(ChecksumAlgorithm::Sha512),
            _ => Err(crate::error::CcpError::Config(format!(
                "Unsupported checksum algorithm: {}",
                s
            ))),
        }
    }
}

/// Whether the file starts with the gzip magic bytes
pub fn is_gzip(path: impl AsRef<Path>) -> Result<bool> {
    let mut magic = [0u8; 2];
    let mut file = File::open(path)?;
    let mut read = 0;
    while read < magic.len() {
        let n = file.read(&mut magic[read..])?;
        if n == 0 {
            return Ok(false);
        }
        read += n;
    }
    Ok(magic == GZIP_MAGIC)
}

/// Open a file for buffered reading, decompressing gzip content on the fly
pub fn open_buffered(path: impl AsRef<Path>, capacity: usize) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let mut reader = BufReader::with_capacity(capacity, File::open(path)?);

    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        debug!(path = %path.display(), "Opening gzip-compressed input");
        let decoder = MultiGzDecoder::new(reader);
        return Ok(Box::new(BufReader::with_capacity(capacity, decoder)));
    }
    Ok(Box::new(reader))
}

/// Compute checksum for a file
pub fn compute_file_checksum(
    path: impl AsRef<Path>,
    algorithm: ChecksumAlgorithm,
) -> Result<String> {
    let mut file = File::open(path)?;
    compute_checksum(&mut file, algorithm)
}

/// Compute checksum for any readable source
pub fn compute_checksum<R: Read>(reader: &mut R, algorithm: ChecksumAlgorithm) -> Result<String> {
    match algorithm {
        ChecksumAlgorithm::Sha256 => digest_reader::<Sha256, _>(reader),
        ChecksumAlgorithm::Sha512 => digest_reader::<Sha512, _>(reader),
    }
}

fn digest_reader<D: Digest, R: Read>(reader: &mut R) -> Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Count the lines of a file that survive the configured skip prefix
pub fn count_lines(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<u64> {
    let mut lines = LineIterator::open(path, config)?;
    let mut count = 0;
    while lines.has_next()? {
        lines.next_line()?;
        count += 1;
    }
    Ok(count)
}
