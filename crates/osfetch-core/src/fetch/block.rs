//! Sequential block writer for the download destination.

use std::io::{self, Write};

/// Buffers incoming body bytes and writes them to `inner` in fixed-size blocks, in arrival order.
pub struct BlockWriter<W: Write> {
    inner: W,
    block: Vec<u8>,
    block_size: usize,
    written: u64,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(inner: W, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            inner,
            block: Vec::with_capacity(block_size),
            block_size,
            written: 0,
        }
    }

    /// Bytes already handed to `inner` (excludes the partially filled block).
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Appends `data`, writing out every block that fills up. Returns how many blocks were written.
    pub fn push(&mut self, mut data: &[u8]) -> io::Result<usize> {
        let mut blocks = 0;
        while !data.is_empty() {
            let room = self.block_size - self.block.len();
            let take = room.min(data.len());
            self.block.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.block.len() == self.block_size {
                self.write_block()?;
                blocks += 1;
            }
        }
        Ok(blocks)
    }

    /// Writes the trailing partial block and flushes. Returns the writer and the total byte count.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if !self.block.is_empty() {
            self.write_block()?;
        }
        self.inner.flush()?;
        Ok((self.inner, self.written))
    }

    fn write_block(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.block)?;
        self.written += self.block.len() as u64;
        self.block.clear();
        Ok(())
    }
}
