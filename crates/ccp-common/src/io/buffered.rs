//! Buffered random-access reader
//!
//! [`BufferedRandomAccessFile`] keeps a fixed-size window of the underlying
//! file in memory. Single-byte reads and line reads are served from that
//! window; seeks that land inside it only move the cursor.
//!
//! Invariant: the physical position of the inner reader is always
//! `buffer_start + buffer_len`.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use memchr::memchr2;
use tracing::trace;

use super::line::{LineTerminator, RawLine};
use super::LineSource;
use crate::config::DEFAULT_BUFFER_SIZE;
use crate::encoding::{ByteList, CharacterEncoding};
use crate::error::{CcpError, Result};

/// Random-access reader with an internal byte buffer and line extraction
pub struct BufferedRandomAccessFile<R = File> {
    inner: R,
    buffer: Box<[u8]>,
    /// Number of valid bytes in `buffer`
    buffer_len: usize,
    /// Read position inside `buffer`
    cursor: usize,
    /// Absolute offset of `buffer[0]`
    buffer_start: u64,
    encoding: CharacterEncoding,
    line_bytes: ByteList,
    last_terminator: Option<LineTerminator>,
}

impl BufferedRandomAccessFile<File> {
    /// Open `path` with the default 64 KiB buffer
    pub fn open(path: impl AsRef<Path>, encoding: CharacterEncoding) -> Result<Self> {
        Self::with_capacity(path, encoding, DEFAULT_BUFFER_SIZE)
    }

    /// Open `path` with a buffer of `buffer_size` bytes
    pub fn with_capacity(
        path: impl AsRef<Path>,
        encoding: CharacterEncoding,
        buffer_size: usize,
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, encoding, buffer_size)
    }
}

impl<R: Read + Seek> BufferedRandomAccessFile<R> {
    /// Wrap an already opened reader
    ///
    /// Reading starts at the reader's current position; all offsets reported
    /// afterwards are absolute positions in the reader.
    pub fn from_reader(
        mut inner: R,
        encoding: CharacterEncoding,
        buffer_size: usize,
    ) -> Result<Self> {
        if buffer_size == 0 {
            return Err(CcpError::Config("Buffer size must be greater than zero".to_string()));
        }
        let buffer_start = inner.stream_position()?;

        Ok(Self {
            inner,
            buffer: vec![0u8; buffer_size].into_boxed_slice(),
            buffer_len: 0,
            cursor: 0,
            buffer_start,
            encoding,
            line_bytes: ByteList::with_capacity(256),
            last_terminator: None,
        })
    }

    pub fn encoding(&self) -> CharacterEncoding {
        self.encoding
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Absolute offset of the next byte to be read
    pub fn file_pointer(&self) -> u64 {
        self.buffer_start + self.cursor as u64
    }

    /// Total length of the underlying input in bytes
    pub fn length(&mut self) -> Result<u64> {
        let physical = self.buffer_start + self.buffer_len as u64;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(physical))?;
        Ok(end)
    }

    /// Read the next byte, `None` at end of input
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.cursor >= self.buffer_len && self.fill_buffer()? == 0 {
            return Ok(None);
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(Some(byte))
    }

    /// Move the read position to the absolute offset `pos`
    ///
    /// Positions inside the buffered window only move the cursor. Any other
    /// position triggers a physical seek and a buffer reload.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        let window_end = self.buffer_start + self.buffer_len as u64;
        if pos >= self.buffer_start && pos < window_end {
            self.cursor = (pos - self.buffer_start) as usize;
            return Ok(());
        }

        trace!(pos, buffer_start = self.buffer_start, "Seek outside buffer, reloading");
        self.inner.seek(SeekFrom::Start(pos))?;
        self.buffer_start = pos;
        self.buffer_len = 0;
        self.cursor = 0;
        self.fill_buffer()?;
        Ok(())
    }

    /// Read the next line, stripping its LF, CR or CRLF terminator
    ///
    /// Returns `None` only at end of input with no pending bytes, so an empty
    /// line is `Some("")`.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let start = self.file_pointer();
        self.line_bytes.clear();

        let terminator = loop {
            if self.cursor >= self.buffer_len && self.fill_buffer()? == 0 {
                if self.line_bytes.is_empty() {
                    return Ok(None);
                }
                break LineTerminator::Eof;
            }

            let window = &self.buffer[self.cursor..self.buffer_len];
            match memchr2(b'\n', b'\r', window) {
                Some(i) => {
                    let found = window[i];
                    self.line_bytes.extend_from_slice(&window[..i]);
                    self.cursor += i + 1;

                    if found == b'\n' {
                        break LineTerminator::Lf;
                    }
                    let after_cr = self.file_pointer();
                    match self.read_byte()? {
                        Some(b'\n') => break LineTerminator::CrLf,
                        Some(_) => {
                            // the byte after a lone CR belongs to the next line
                            self.seek(after_cr)?;
                            break LineTerminator::Cr;
                        }
                        None => break LineTerminator::Cr,
                    }
                }
                None => {
                    self.line_bytes.extend_from_slice(window);
                    self.cursor = self.buffer_len;
                }
            }
        };

        let text = self.line_bytes.decode(self.encoding, start)?;
        self.last_terminator = Some(terminator);
        Ok(Some(text))
    }

    /// Terminator of the most recently read line
    pub fn last_terminator(&self) -> Result<LineTerminator> {
        self.last_terminator
            .ok_or_else(|| CcpError::IllegalState("No line has been read yet".to_string()))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_buffer(&mut self) -> Result<usize> {
        self.buffer_start += self.buffer_len as u64;
        self.cursor = 0;
        self.buffer_len = 0;

        let read = loop {
            match self.inner.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };
        self.buffer_len = read;
        trace!(buffer_start = self.buffer_start, bytes = read, "Filled read buffer");
        Ok(read)
    }
}

impl<R: Read + Seek> LineSource for BufferedRandomAccessFile<R> {
    fn read_raw_line(&mut self) -> Result<Option<RawLine>> {
        let byte_offset = self.file_pointer();
        let Some(text) = self.read_line()? else {
            return Ok(None);
        };
        Ok(Some(RawLine {
            text,
            terminator: self.last_terminator()?,
            byte_offset: Some(byte_offset),
        }))
    }
}
