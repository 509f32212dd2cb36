//! Skip-aware line iterator

use std::fs::File;
use std::io::{BufRead, Read, Seek};
use std::path::Path;

use tracing::trace;

use super::buffered::BufferedRandomAccessFile;
use super::line::{utf16_len, Line};
use super::stream::StreamLineReader;
use super::LineSource;
use crate::config::ReaderConfig;
use crate::error::{CcpError, Result};
use crate::fileutil;

/// Iterator over a file, with byte offsets
pub type FileLineIterator = LineIterator<BufferedRandomAccessFile<File>>;

/// Iterator over an opaque stream, without byte offsets
pub type StreamLineIterator = LineIterator<StreamLineReader<Box<dyn BufRead>>>;

/// Single-pass iterator producing [`Line`]s from a [`LineSource`]
///
/// Lines whose trimmed text starts with the skip prefix are consumed but not
/// returned. They do not advance the line number, but their characters and
/// bytes still count towards the offsets of the lines that follow.
pub struct LineIterator<S> {
    source: S,
    skip_prefix: Option<String>,
    lookahead: Option<Line>,
    exhausted: bool,
    character_offset: u64,
    code_point_offset: u64,
    line_number: u64,
    skipped: u64,
    /// Start of the furthest line read, so replayed comments are counted once
    furthest_start: Option<u64>,
}

impl<S: LineSource> LineIterator<S> {
    pub fn new(source: S, skip_prefix: Option<String>) -> Self {
        Self {
            source,
            skip_prefix: skip_prefix.filter(|p| !p.is_empty()),
            lookahead: None,
            exhausted: false,
            character_offset: 0,
            code_point_offset: 0,
            line_number: 0,
            skipped: 0,
            furthest_start: None,
        }
    }

    pub fn skip_prefix(&self) -> Option<&str> {
        self.skip_prefix.as_deref()
    }

    /// Replace the skip prefix
    ///
    /// Only affects lines that have not been read ahead yet.
    pub fn set_skip_prefix(&mut self, prefix: Option<String>) {
        self.skip_prefix = prefix.filter(|p| !p.is_empty());
    }

    /// Number of distinct lines skipped so far
    ///
    /// Comment lines replayed after [`reset_to`](LineIterator::reset_to) are
    /// not counted again.
    pub fn skipped_lines(&self) -> u64 {
        self.skipped
    }

    /// Whether another line is available
    ///
    /// Reads ahead at most one line; repeated calls do not advance. A read
    /// or decode error ends the iteration.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        match self.read_next() {
            Ok(line) => self.lookahead = line,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        }
        if self.lookahead.is_none() {
            self.exhausted = true;
        }
        Ok(self.lookahead.is_some())
    }

    /// The next line without consuming it
    pub fn peek(&mut self) -> Result<Option<&Line>> {
        self.has_next()?;
        Ok(self.lookahead.as_ref())
    }

    /// Return the next line, failing with [`CcpError::NoSuchElement`] when
    /// the input is exhausted
    pub fn next_line(&mut self) -> Result<Line> {
        if !self.has_next()? {
            return Err(CcpError::NoSuchElement);
        }
        self.lookahead.take().ok_or(CcpError::NoSuchElement)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn is_skipped(&self, text: &str) -> bool {
        match self.skip_prefix.as_deref() {
            Some(prefix) => text.trim().starts_with(prefix),
            None => false,
        }
    }

    fn read_next(&mut self) -> Result<Option<Line>> {
        while let Some(raw) = self.source.read_raw_line()? {
            let character_offset = self.character_offset;
            let code_point_offset = self.code_point_offset;
            let terminator_len = raw.terminator.len();
            self.character_offset += utf16_len(&raw.text) + terminator_len;
            self.code_point_offset += raw.text.chars().count() as u64 + terminator_len;

            let replayed = match (raw.byte_offset, self.furthest_start) {
                (Some(offset), Some(furthest)) => offset <= furthest,
                _ => false,
            };
            if let Some(offset) = raw.byte_offset {
                self.furthest_start = Some(self.furthest_start.map_or(offset, |f| f.max(offset)));
            }

            if self.is_skipped(&raw.text) {
                if !replayed {
                    self.skipped += 1;
                }
                trace!(byte_offset = ?raw.byte_offset, "Skipping line");
                continue;
            }

            let line = Line::new(
                raw.text,
                raw.terminator,
                character_offset,
                code_point_offset,
                self.line_number,
                raw.byte_offset,
            );
            self.line_number += 1;
            return Ok(Some(line));
        }
        Ok(None)
    }
}

impl<S: LineSource> Iterator for LineIterator<S> {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => self.lookahead.take().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl FileLineIterator {
    /// Open a file with full offset tracking
    pub fn open(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        let reader =
            BufferedRandomAccessFile::with_capacity(path, config.encoding, config.buffer_size)?;
        Ok(Self::new(reader, config.skip_prefix.clone()))
    }
}

impl<R: Read + Seek> LineIterator<BufferedRandomAccessFile<R>> {
    /// Continue iteration at a line returned earlier by this iterator
    ///
    /// Offsets and the line number are restored from `line`, so the next
    /// call to [`next_line`](Self::next_line) yields `line` again.
    pub fn reset_to(&mut self, line: &Line) -> Result<()> {
        let byte_offset = line.byte_offset.ok_or_else(|| {
            CcpError::IllegalState("Cannot reset to a line without byte offset".to_string())
        })?;
        self.source.seek(byte_offset)?;
        self.character_offset = line.character_offset;
        self.code_point_offset = line.code_point_offset;
        self.line_number = line.line_number;
        self.lookahead = None;
        self.exhausted = false;
        Ok(())
    }

    /// Restart from the beginning of the file
    pub fn rewind(&mut self) -> Result<()> {
        self.source.seek(0)?;
        self.character_offset = 0;
        self.code_point_offset = 0;
        self.line_number = 0;
        self.skipped = 0;
        self.furthest_start = None;
        self.lookahead = None;
        self.exhausted = false;
        Ok(())
    }
}

impl<R: BufRead> LineIterator<StreamLineReader<R>> {
    /// Iterate over an already opened stream, without byte offsets
    pub fn from_reader(reader: R, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            StreamLineReader::new(reader, config.encoding),
            config.skip_prefix.clone(),
        ))
    }
}

impl StreamLineIterator {
    /// Open a file as a stream, decompressing gzip input transparently
    pub fn open_stream(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        config.validate()?;
        let reader = fileutil::open_buffered(path, config.buffer_size)?;
        Ok(Self::new(
            StreamLineReader::new(reader, config.encoding),
            config.skip_prefix.clone(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::encoding::CharacterEncoding;
    use crate::io::LineTerminator;
    use std::io::Cursor;

    type CursorIter = LineIterator<BufferedRandomAccessFile<Cursor<Vec<u8>>>>;

    fn file_iter(data: &[u8], skip: Option<&str>) -> CursorIter {
        let reader = BufferedRandomAccessFile::from_reader(
            Cursor::new(data.to_vec()),
            CharacterEncoding::Utf8,
            4,
        )
        .unwrap();
        LineIterator::new(reader, skip.map(str::to_string))
    }

    #[test]
    fn test_has_next_is_idempotent() {
        let mut it = file_iter(b"one\ntwo\n", None);
        assert!(it.has_next().unwrap());
        assert!(it.has_next().unwrap());
        assert!(it.has_next().unwrap());
        assert_eq!(it.next_line().unwrap().text, "one");
        assert!(it.has_next().unwrap());
        assert_eq!(it.next_line().unwrap().text, "two");
        assert!(!it.has_next().unwrap());
        assert!(!it.has_next().unwrap());
    }

    #[test]
    fn test_next_on_exhausted_fails() {
        let mut it = file_iter(b"only", None);
        assert_eq!(it.next_line().unwrap().text, "only");
        assert!(matches!(it.next_line(), Err(CcpError::NoSuchElement)));
        assert!(matches!(it.next_line(), Err(CcpError::NoSuchElement)));
    }

    #[test]
    fn test_skipped_lines_keep_offsets_but_not_numbers() {
        let mut it = file_iter(b"#header\ndata1\n  # indented comment\r\ndata2\n", Some("#"));

        let first = it.next_line().unwrap();
        assert_eq!(first.text, "data1");
        assert_eq!(first.line_number, 0);
        assert_eq!(first.byte_offset, Some(8));
        assert_eq!(first.character_offset, 8);

        let second = it.next_line().unwrap();
        assert_eq!(second.text, "data2");
        assert_eq!(second.line_number, 1);
        // "#header\n" (8) + "data1\n" (6) + "  # indented comment\r\n" (22)
        assert_eq!(second.byte_offset, Some(36));
        assert_eq!(second.character_offset, 36);
        assert_eq!(second.code_point_offset, 36);

        assert!(it.next().is_none());
        assert_eq!(it.skipped_lines(), 2);
    }

    #[test]
    fn test_offsets_with_supplementary_characters() {
        let mut it = file_iter("😀é\nnext\n".as_bytes(), None);
        let first = it.next_line().unwrap();
        assert_eq!(first.character_offset, 0);
        let second = it.next_line().unwrap();
        // 😀 is 4 bytes / 2 UTF-16 units / 1 code point, é is 2 / 1 / 1
        assert_eq!(second.byte_offset, Some(7));
        assert_eq!(second.character_offset, 4);
        assert_eq!(second.code_point_offset, 3);
        assert!(second.code_point_offset <= second.character_offset);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut it = file_iter(b"a\nb\n", None);
        assert_eq!(it.peek().unwrap().map(|l| l.text.clone()), Some("a".to_string()));
        assert_eq!(it.next_line().unwrap().text, "a");
    }

    #[test]
    fn test_reset_to_replays_line() {
        let mut it = file_iter(b"zero\none\ntwo\nthree\n", None);
        it.next_line().unwrap();
        let one = it.next_line().unwrap();
        it.next_line().unwrap();
        it.next_line().unwrap();
        assert!(!it.has_next().unwrap());

        it.reset_to(&one).unwrap();
        let replay = it.next_line().unwrap();
        assert_eq!(replay, one);
        assert_eq!(it.next_line().unwrap().line_number, 2);
    }

    #[test]
    fn test_reset_to_does_not_recount_skipped_lines() {
        let mut it = file_iter(b"#a\none\n#b\ntwo\n", Some("#"));
        let one = it.next_line().unwrap();
        it.next_line().unwrap();
        assert!(!it.has_next().unwrap());
        assert_eq!(it.skipped_lines(), 2);

        it.reset_to(&one).unwrap();
        assert_eq!(it.next_line().unwrap(), one);
        assert_eq!(it.next_line().unwrap().text, "two");
        assert_eq!(it.skipped_lines(), 2);
    }

    #[test]
    fn test_decode_error_ends_iteration() {
        let mut it = file_iter(b"ok\n\xff\xfe\nabc\n", None);
        let first = it.next().unwrap().unwrap();
        assert_eq!(first.text, "ok");
        assert!(matches!(it.next(), Some(Err(CcpError::Decode { offset: 3, .. }))));
        assert!(it.next().is_none());
        assert!(!it.has_next().unwrap());
        assert!(matches!(it.next_line(), Err(CcpError::NoSuchElement)));
    }

    #[test]
    fn test_rewind() {
        let mut it = file_iter(b"#c\na\nb", Some("#"));
        let all: Vec<Line> = it.by_ref().map(|l| l.unwrap()).collect();
        it.rewind().unwrap();
        let again: Vec<Line> = it.by_ref().map(|l| l.unwrap()).collect();
        assert_eq!(all, again);
        assert_eq!(again.last().unwrap().terminator, LineTerminator::Eof);
    }

    #[test]
    fn test_stream_iterator_has_no_byte_offsets() {
        let config = ReaderConfig::new().with_skip_prefix("!");
        let input = Cursor::new(b"!gpa-version: 1.1\nrow\n".to_vec());
        let it = LineIterator::from_reader(input, &config).unwrap();
        let lines: Vec<Line> = it.map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "row");
        assert_eq!(lines[0].line_number, 0);
        assert_eq!(lines[0].character_offset, 18);
        assert_eq!(lines[0].byte_offset, None);
    }

    #[test]
    fn test_reset_without_byte_offset_fails() {
        let mut it = file_iter(b"a\n", None);
        let line = Line::new("a".to_string(), LineTerminator::Lf, 0, 0, 0, None);
        assert!(matches!(it.reset_to(&line), Err(CcpError::IllegalState(_))));
    }
}
