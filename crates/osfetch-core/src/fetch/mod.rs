//! Streaming HTTP GET to a local file.
//!
//! The body is written sequentially in fixed-size blocks and the byte count is
//! checked against the `Content-Length` the server declared. No retries: a
//! failed or short transfer is returned to the caller as is, and a partially
//! written file is left in place.

mod block;
mod headers;

pub use block::BlockWriter;

use crate::error::{OsfError, Result};
use crate::progress::Progress;
use headers::DeclaredLength;
use std::cell::Cell;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str;

/// Result of a completed, length-verified download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    pub bytes_written: u64,
    /// Declared `Content-Length`; 0 when the server did not send one.
    pub declared_len: u64,
}

/// Fails with `DownloadIncomplete` when a nonzero declared length differs from what was written.
pub fn verify_length(url: &str, declared: u64, written: u64) -> Result<()> {
    if declared != 0 && written != declared {
        return Err(OsfError::DownloadIncomplete {
            url: url.to_string(),
            declared,
            written,
        });
    }
    Ok(())
}

/// Downloads `url` to `dest` (created or truncated), writing `block_size`-byte blocks in order.
///
/// `on_progress` is called after every block reaches the file and once more at the end.
/// Runs on the calling thread and blocks until the transfer ends.
pub fn fetch_to_path(
    url: &str,
    dest: &Path,
    block_size: usize,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<FetchOutcome> {
    let file = File::create(dest).map_err(|e| OsfError::io(dest, e))?;
    let mut writer = BlockWriter::new(file, block_size);
    let declared = Cell::new(DeclaredLength::default());
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| OsfError::transfer(url, e))?;
    easy.follow_location(true)
        .map_err(|e| OsfError::transfer(url, e))?;
    easy.max_redirections(10)
        .map_err(|e| OsfError::transfer(url, e))?;

    tracing::debug!(url, dest = %dest.display(), block_size, "starting download");

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    let mut d = declared.get();
                    d.observe(line);
                    declared.set(d);
                }
                true
            })
            .map_err(|e| OsfError::transfer(url, e))?;
        transfer
            .write_function(|data| match writer.push(data) {
                Ok(blocks) => {
                    if blocks > 0 {
                        on_progress(Progress {
                            bytes_written: writer.written(),
                            total: Some(declared.get().get()).filter(|n| *n > 0),
                        });
                    }
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("download write to {} failed: {}", dest.display(), e);
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(|e| OsfError::transfer(url, e))?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(OsfError::io(dest, e));
    }
    // Whatever arrived stays on disk, even when the transfer failed.
    let (_file, written) = writer.finish().map_err(|e| OsfError::io(dest, e))?;
    let declared = declared.get().get();

    if let Err(e) = performed {
        if e.is_partial_file() {
            return Err(OsfError::DownloadIncomplete {
                url: url.to_string(),
                declared,
                written,
            });
        }
        return Err(OsfError::transfer(url, e));
    }

    let status = easy
        .response_code()
        .map_err(|e| OsfError::transfer(url, e))?;
    if !(200..300).contains(&status) {
        return Err(OsfError::Http {
            url: url.to_string(),
            status,
        });
    }

    on_progress(Progress {
        bytes_written: written,
        total: Some(declared).filter(|n| *n > 0),
    });
    verify_length(url, declared, written)?;

    tracing::info!(url, bytes = written, "download complete");
    Ok(FetchOutcome {
        bytes_written: written,
        declared_len: declared,
    })
}
