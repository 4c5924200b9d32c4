//! Tarball extraction next to the archive, followed by removal of the archive.

use crate::error::{OsfError, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Compound extensions recognised as tarballs, longest first.
const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// What an extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Directory the entries were unpacked into (the archive's parent).
    pub dest_dir: PathBuf,
    /// Archive path with its compound extension stripped, where the contents conventionally live.
    pub extracted_dir: PathBuf,
    /// Number of archive entries written.
    pub entries: usize,
}

/// Directory an archive conventionally unpacks to: `data/ssim_images.tar.gz` -> `data/ssim_images`.
/// None when the name has no known archive extension.
pub fn extracted_dir_for(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    ARCHIVE_SUFFIXES.iter().find_map(|suffix| {
        let stem = name.strip_suffix(suffix)?;
        if stem.is_empty() {
            return None;
        }
        Some(path.with_file_name(stem))
    })
}

/// True if the file name carries a tarball extension.
pub fn is_archive(path: &Path) -> bool {
    extracted_dir_for(path).is_some()
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Opens the archive, transparently decoding gzip when the magic bytes say so.
///
/// A file (or decompressed stream) with no bytes at all is not an archive. A
/// tar with zero members still carries its end-of-archive blocks and passes.
fn open_archive(path: &Path) -> Result<Box<dyn BufRead>> {
    let mut file = File::open(path).map_err(|e| OsfError::extraction(path, e))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .map_err(|e| OsfError::extraction(path, e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| OsfError::extraction(path, e))?;
    let reader = BufReader::new(file);
    let mut reader: Box<dyn BufRead> = if n == GZIP_MAGIC.len() && magic == GZIP_MAGIC {
        Box::new(BufReader::new(GzDecoder::new(reader)))
    } else {
        Box::new(reader)
    };
    let empty = reader
        .fill_buf()
        .map_err(|e| OsfError::extraction(path, e))?
        .is_empty();
    if empty {
        return Err(OsfError::extraction(path, "empty archive"));
    }
    Ok(reader)
}

/// Unpacks every entry of `path` into its parent directory, then deletes `path`.
///
/// Relative paths and directory structure are kept as stored. An absolute entry
/// path, or one that would land outside the parent directory, fails the whole
/// extraction. Nothing is cleaned up on failure.
pub fn extract_archive(path: &Path) -> Result<Extracted> {
    let dest_dir = parent_dir(path);
    let dest = dest_dir
        .canonicalize()
        .map_err(|e| OsfError::extraction(path, format!("{}: {}", dest_dir.display(), e)))?;

    tracing::info!(archive = %path.display(), dest = %dest.display(), "extracting");

    let mut entries = 0usize;
    {
        let mut archive = tar::Archive::new(open_archive(path)?);
        archive.set_preserve_mtime(true);
        archive.set_overwrite(true);

        for entry in archive
            .entries()
            .map_err(|e| OsfError::extraction(path, e))?
        {
            let mut entry = entry.map_err(|e| OsfError::extraction(path, e))?;
            let entry_path = entry
                .path()
                .map_err(|e| OsfError::extraction(path, e))?
                .into_owned();
            if entry_path.is_absolute() {
                return Err(OsfError::extraction(
                    path,
                    format!("entry {} has an absolute path", entry_path.display()),
                ));
            }
            let inside = entry.unpack_in(&dest).map_err(|e| {
                OsfError::extraction(path, format!("{}: {}", entry_path.display(), e))
            })?;
            if !inside {
                return Err(OsfError::extraction(
                    path,
                    format!("entry {} escapes {}", entry_path.display(), dest.display()),
                ));
            }
            tracing::debug!(entry = %entry_path.display(), "unpacked");
            entries += 1;
        }
    }

    fs::remove_file(path).map_err(|e| OsfError::io(path, e))?;

    let extracted_dir = extracted_dir_for(path).unwrap_or_else(|| dest_dir.clone());
    tracing::info!(entries, dir = %extracted_dir.display(), "extraction complete");
    Ok(Extracted {
        dest_dir,
        extracted_dir,
        entries,
    })
}
