//! Growable sink for codec output.

use std::io::{self, Write};

use tracing::trace;

/// Collects every chunk the codec emits before anything reaches the
/// caller's destination buffer.
#[derive(Debug, Default)]
pub struct StagingBuffer {
    bytes: Vec<u8>,
    chunks: usize,
}

impl StagingBuffer {
    /// Create an empty staging buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes staged so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of staged bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of write calls received from the codec.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Take ownership of the staged bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl Write for StagingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        self.chunks += 1;
        trace!(chunk = buf.len(), total = self.bytes.len(), "Staged codec output");
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
