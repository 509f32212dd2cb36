//! Stream-backed line source
//!
//! Works on any [`BufRead`], including pipes and decompressed streams that
//! cannot seek. Byte offsets are not reported for lines read this way.

use std::io::{BufRead, ErrorKind};

use memchr::memchr2;

use super::line::{LineTerminator, RawLine};
use super::LineSource;
use crate::encoding::{ByteList, CharacterEncoding};
use crate::error::Result;

/// Line reader over a buffered character stream
pub struct StreamLineReader<R> {
    inner: R,
    encoding: CharacterEncoding,
    line_bytes: ByteList,
    /// Bytes consumed so far, only used to locate decode errors
    consumed: u64,
}

impl<R: BufRead> StreamLineReader<R> {
    pub fn new(inner: R, encoding: CharacterEncoding) -> Self {
        Self {
            inner,
            encoding,
            line_bytes: ByteList::with_capacity(256),
            consumed: 0,
        }
    }

    pub fn encoding(&self) -> CharacterEncoding {
        self.encoding
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn consume(&mut self, amount: usize) {
        self.inner.consume(amount);
        self.consumed += amount as u64;
    }
}

impl<R: BufRead> LineSource for StreamLineReader<R> {
    fn read_raw_line(&mut self) -> Result<Option<RawLine>> {
        let start = self.consumed;
        self.line_bytes.clear();

        let terminator = loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if available.is_empty() {
                if self.line_bytes.is_empty() {
                    return Ok(None);
                }
                break LineTerminator::Eof;
            }

            match memchr2(b'\n', b'\r', available) {
                Some(i) => {
                    let found = available[i];
                    self.line_bytes.extend_from_slice(&available[..i]);
                    self.consume(i + 1);

                    if found == b'\n' {
                        break LineTerminator::Lf;
                    }
                    if self.peek_byte()? == Some(b'\n') {
                        self.consume(1);
                        break LineTerminator::CrLf;
                    }
                    break LineTerminator::Cr;
                }
                None => {
                    let len = available.len();
                    self.line_bytes.extend_from_slice(available);
                    self.consume(len);
                }
            }
        };

        let text = self.line_bytes.decode(self.encoding, start)?;
        Ok(Some(RawLine {
            text,
            terminator,
            byte_offset: None,
        }))
    }
}
