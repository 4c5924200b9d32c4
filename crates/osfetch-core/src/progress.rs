//! Progress reporting for a single download (bytes written vs declared length).

/// Snapshot of download progress, sent after every block written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes written to the destination so far.
    pub bytes_written: u64,
    /// Server-declared `Content-Length`, if the server sent a nonzero one.
    pub total: Option<u64>,
}

impl Progress {
    /// Fraction complete in [0.0, 1.0], or None when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total?;
        if total == 0 {
            return None;
        }
        Some((self.bytes_written as f64 / total as f64).min(1.0))
    }

    /// Number of `block_size` blocks the whole transfer spans (None if total unknown).
    pub fn total_blocks(&self, block_size: usize) -> Option<u64> {
        let total = self.total?;
        let block = block_size.max(1) as u64;
        Some(total.div_ceil(block))
    }
}
