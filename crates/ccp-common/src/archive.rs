//! Archive and compression utilities
//!
//! # Supported Formats
//!
//! - **Gzip** (.gz): Using flate2
//! - **Tar** (.tar): Using tar crate
//! - **Tar.gz** (.tar.gz, .tgz): Combined gzip + tar
//! - **Zip** (.zip): Using zip crate
//!
//! # Examples
//!
//! ```rust,no_run
//! use ccp_common::archive::{unpack, extract_entries, ArchiveKind};
//!
//! # fn main() -> ccp_common::Result<()> {
//! // Unpack an archive to disk
//! let written = unpack("oa_package.tar.gz", "./out")?;
//!
//! // Pull single members into memory
//! let data = std::fs::read("gene_info.zip")?;
//! let files = extract_entries(&data, ArchiveKind::Zip, &["gene_info"])?;
//! # Ok(())
//! # }
//! ```

use crate::error::{CcpError, Result};
use flate2::read::MultiGzDecoder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive container type, detected from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Gzip,
    Tar,
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Detect the archive kind from the file name suffix
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".gz") {
            Some(ArchiveKind::Gzip)
        } else {
            None
        }
    }
}

/// Decompress gzip-compressed data held in memory
pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| CcpError::Archive(format!("Failed to decompress gzip data: {}", e)))?;
    debug!("Decompressed {} -> {} bytes", data.len(), decompressed.len());
    Ok(decompressed)
}

/// Extract members of an in-memory archive by file name
///
/// `names` are matched against the last path component of each member; an
/// empty list extracts every file. Requested names that are not present
/// cause an error.
pub fn extract_entries(
    data: &[u8],
    kind: ArchiveKind,
    names: &[&str],
) -> Result<HashMap<String, Vec<u8>>> {
    let wanted: HashSet<&str> = names.iter().copied().collect();
    let mut result = HashMap::new();

    match kind {
        ArchiveKind::Gzip => {
            return Err(CcpError::Archive(
                "Gzip data holds a single stream, use decompress_gzip".to_string(),
            ))
        }
        ArchiveKind::Tar => {
            collect_tar(tar::Archive::new(Cursor::new(data)), &wanted, &mut result)?
        }
        ArchiveKind::TarGz => collect_tar(
            tar::Archive::new(MultiGzDecoder::new(Cursor::new(data))),
            &wanted,
            &mut result,
        )?,
        ArchiveKind::Zip => {
            let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
            for i in 0..archive.len() {
                let mut file = archive.by_index(i)?;
                if file.is_dir() {
                    continue;
                }
                let filename = last_component(file.name());
                if wanted.is_empty() || wanted.contains(filename.as_str()) {
                    let mut contents = Vec::new();
                    file.read_to_end(&mut contents)?;
                    debug!("Extracted {} ({} bytes)", filename, contents.len());
                    result.insert(filename, contents);
                }
            }
        }
    }

    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !result.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(CcpError::Archive(format!("Missing files in archive: {:?}", missing)));
    }

    Ok(result)
}

/// Decompress a gzip file to `dest`, returning the number of bytes written
pub fn gunzip_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(src.as_ref())?));
    let mut out = File::create(dest.as_ref())?;
    let written = std::io::copy(&mut decoder, &mut out)?;
    debug!(
        src = %src.as_ref().display(),
        dest = %dest.as_ref().display(),
        bytes = written,
        "Decompressed gzip file"
    );
    Ok(written)
}

/// Unpack an archive into `dest_dir`, returning the paths of written files
///
/// Members whose path would escape `dest_dir` are skipped with a warning.
pub fn unpack(archive: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let archive = archive.as_ref();
    let dest_dir = dest_dir.as_ref();
    let kind = ArchiveKind::from_path(archive).ok_or_else(|| {
        CcpError::Archive(format!("Unrecognised archive type: {}", archive.display()))
    })?;
    std::fs::create_dir_all(dest_dir)?;

    let written = match kind {
        ArchiveKind::Gzip => {
            let name = archive
                .file_stem()
                .ok_or_else(|| CcpError::Archive(format!("No file name: {}", archive.display())))?;
            let dest = dest_dir.join(name);
            gunzip_file(archive, &dest)?;
            vec![dest]
        }
        ArchiveKind::Tar => {
            unpack_tar(tar::Archive::new(BufReader::new(File::open(archive)?)), dest_dir)?
        }
        ArchiveKind::TarGz => unpack_tar(
            tar::Archive::new(MultiGzDecoder::new(BufReader::new(File::open(archive)?))),
            dest_dir,
        )?,
        ArchiveKind::Zip => unpack_zip(File::open(archive)?, dest_dir)?,
    };

    info!(
        archive = %archive.display(),
        dest = %dest_dir.display(),
        files = written.len(),
        "Unpacked archive"
    );
    Ok(written)
}

fn last_component(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

fn collect_tar<R: Read>(
    mut archive: tar::Archive<R>,
    wanted: &HashSet<&str>,
    result: &mut HashMap<String, Vec<u8>>,
) -> Result<()> {
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let filename = last_component(&entry.path()?.to_string_lossy());
        if wanted.is_empty() || wanted.contains(filename.as_str()) {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            debug!("Extracted {} ({} bytes)", filename, contents.len());
            result.insert(filename, contents);
        }
    }
    Ok(())
}

fn unpack_tar<R: Read>(mut archive: tar::Archive<R>, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let relative = entry.path()?.into_owned();
        let is_file = entry.header().entry_type().is_file();
        if !entry.unpack_in(dest_dir)? {
            warn!(path = %relative.display(), "Skipping tar entry outside destination");
            continue;
        }
        if is_file {
            written.push(dest_dir.join(relative));
        }
    }
    Ok(written)
}

fn unpack_zip(file: File, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        let Some(relative) = member.enclosed_name() else {
            warn!(name = member.name(), "Skipping zip entry outside destination");
            continue;
        };
        let target = dest_dir.join(relative);

        if member.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        std::io::copy(&mut member, &mut out)?;
        written.push(target);
    }
    Ok(written)
}
