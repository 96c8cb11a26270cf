//! Byte channels: where encoded bytes go and where encoded bytes come from.
//!
//! Each direction has two modes. The buffered mode works on a contiguous
//! in-memory region ([`BufferSink`], [`SliceSource`]); the streaming mode
//! wraps an external [`Write`] or [`Read`] ([`StreamSink`], [`StreamSource`]).

use std::io::{self, Read, Write};

use bytes::Bytes;
use tracing::trace;

use crate::constants::INITIAL_BUFFER_CAPACITY;

/// Destination of encoded bytes.
///
/// `flush` comes from [`Write`]; implementors forward `Write::write` to
/// [`Sink::write_chunk`].
pub trait Sink: Write {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;
}

/// Origin of encoded bytes.
pub trait Source {
    /// Reads the next byte, or `None` once the data is exhausted.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Reads exactly `len` bytes, or `None` if fewer than `len` remain.
    fn read_exact(&mut self, len: usize) -> io::Result<Option<Bytes>>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;
}

/// Smallest power-of-two multiple of `capacity` that holds `needed` bytes.
fn grown_capacity(capacity: usize, needed: usize) -> usize {
    let mut capacity = capacity.max(1);
    while capacity < needed {
        capacity = capacity.saturating_mul(2);
    }
    capacity
}

/// Growable in-memory output buffer.
///
/// Starts at [`INITIAL_BUFFER_CAPACITY`] and doubles until a write fits.
#[derive(Debug)]
pub struct BufferSink {
    buf: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        if needed > self.buf.capacity() {
            let target = grown_capacity(self.buf.capacity(), needed);
            self.buf.reserve_exact(target - self.buf.len());
        }
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for BufferSink {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.reserve(1);
        self.buf.push(byte);
        Ok(())
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.reserve(chunk.len());
        self.buf.extend_from_slice(chunk);
        Ok(())
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Write-combining wrapper around an external writer.
///
/// Small writes are staged and handed to the writer when the staging buffer
/// would overflow; a chunk at least as large as the staging buffer skips it.
/// Staged bytes are only delivered by [`Write::flush`] or
/// [`StreamSink::into_inner`], never on drop.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    inner: W,
    buf: Vec<u8>,
    capacity: usize,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, INITIAL_BUFFER_CAPACITY)
    }

    pub fn with_capacity(inner: W, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes staged but not yet handed to the writer.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Delivers staged bytes and returns the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush_staged()?;
        Ok(self.inner)
    }

    fn flush_staged(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            trace!(len = self.buf.len(), "flushing staged bytes");
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        if self.buf.len() + 1 > self.capacity {
            self.flush_staged()?;
        }
        self.buf.push(byte);
        Ok(())
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.buf.len() + chunk.len() > self.capacity {
            self.flush_staged()?;
        }
        if chunk.len() >= self.capacity {
            trace!(len = chunk.len(), "writing chunk past staging buffer");
            self.inner.write_all(chunk)
        } else {
            self.buf.extend_from_slice(chunk);
            Ok(())
        }
    }
}

impl<W: Write> Write for StreamSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_staged()?;
        self.inner.flush()
    }
}

/// Cursor over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl Source for SliceSource<'_> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_exact(&mut self, len: usize) -> io::Result<Option<Bytes>> {
        if len > self.data.len() - self.pos {
            return Ok(None);
        }
        let bytes = Bytes::copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(Some(bytes))
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Pull-based reader over an external source.
///
/// Every call reads from the wrapped reader directly, so wrap unbuffered
/// sources such as files or sockets in a [`std::io::BufReader`] first.
#[derive(Debug)]
pub struct StreamSource<R: Read> {
    inner: R,
    pos: usize,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for StreamSource<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_exact(&mut self, len: usize) -> io::Result<Option<Bytes>> {
        // Grows with the data actually received, so a forged length cannot
        // force a huge allocation up front.
        let mut buf = Vec::new();
        self.inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)?;
        self.pos += buf.len();
        if buf.len() < len {
            return Ok(None);
        }
        Ok(Some(Bytes::from(buf)))
    }

    fn position(&self) -> usize {
        self.pos
    }
}
