//! Pull parser turning the lines of a delimited file into typed records

use crate::format::FileFormat;
use crate::splitter::Columns;
use ccp_common::config::ReaderConfig;
use ccp_common::io::{
    BufferedRandomAccessFile, Line, LineIterator, LineSource, StreamLineIterator, StreamLineReader,
};
use ccp_common::{CcpError, Result};
use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    NotStarted,
    Iterating,
    Exhausted,
}

/// Parses one record per surfaced line of `S` according to `F`
///
/// The header check runs on [`initialize`](Self::initialize), or implicitly
/// on the first [`has_next`](Self::has_next). At most one record is read
/// ahead. Once exhausted the parser stays exhausted.
pub struct DelimitedFileParser<F: FileFormat, S> {
    format: F,
    lines: LineIterator<S>,
    state: ParserState,
    lookahead: Option<F::Record>,
    records: u64,
}

pub type FileParser<F> = DelimitedFileParser<F, BufferedRandomAccessFile<File>>;

pub type StreamParser<F> = DelimitedFileParser<F, StreamLineReader<Box<dyn BufRead>>>;

impl<F: FileFormat, S: LineSource> DelimitedFileParser<F, S> {
    /// Wrap an existing line iterator, installing the format's comment prefix
    pub fn new(format: F, mut lines: LineIterator<S>) -> Self {
        if let Some(prefix) = format.comment_prefix() {
            lines.set_skip_prefix(Some(prefix.to_string()));
        }
        Self {
            format,
            lines,
            state: ParserState::NotStarted,
            lookahead: None,
            records: 0,
        }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn lines(&self) -> &LineIterator<S> {
        &self.lines
    }

    pub fn into_lines(self) -> LineIterator<S> {
        self.lines
    }

    /// Records handed out so far
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Consume and validate the header line if the format declares one
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != ParserState::NotStarted {
            return Ok(());
        }

        if let Some(header) = self.format.header() {
            let first = if self.lines.has_next()? {
                Some(self.lines.next_line()?)
            } else {
                None
            };
            match first {
                Some(line) if header.matches(&line.text) => {
                    debug!(format = self.format.name(), header = %line.text, "Validated header");
                }
                found => {
                    self.state = ParserState::Exhausted;
                    return Err(CcpError::FormatDrift {
                        format: self.format.name().to_string(),
                        expected: header.pattern().to_string(),
                        found: found.map(|line| line.text),
                    });
                }
            }
        }

        self.state = ParserState::Iterating;
        Ok(())
    }

    pub fn has_next(&mut self) -> Result<bool> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        match self.state {
            ParserState::NotStarted => self.initialize()?,
            ParserState::Exhausted => return Ok(false),
            ParserState::Iterating => {},
        }

        if !self.lines.has_next()? {
            self.state = ParserState::Exhausted;
            info!(
                format = self.format.name(),
                records = self.records,
                skipped_lines = self.lines.skipped_lines(),
                "Finished parsing"
            );
            return Ok(false);
        }

        let line = self.lines.next_line()?;
        self.lookahead = Some(self.parse_line(&line)?);
        Ok(true)
    }

    pub fn next_record(&mut self) -> Result<F::Record> {
        if !self.has_next()? {
            return Err(CcpError::NoSuchElement);
        }
        let record = self.lookahead.take().ok_or(CcpError::NoSuchElement)?;
        self.records += 1;
        Ok(record)
    }

    fn parse_line(&self, line: &Line) -> Result<F::Record> {
        let values = self.format.splitter().split(&line.text);
        let expected = self.format.column_count();
        if !expected.accepts(values.len()) {
            return Err(CcpError::ColumnCount {
                expected: expected.to_string(),
                actual: values.len(),
                line_number: line.line_number,
                line: line.text.clone(),
            });
        }
        let columns = Columns::new(line, values);
        self.format.parse_record(line, &columns)
    }
}

impl<F: FileFormat> FileParser<F> {
    /// Open a file with random access (byte offsets available)
    pub fn open(path: impl AsRef<Path>, format: F, config: &ReaderConfig) -> Result<Self> {
        Ok(Self::new(format, LineIterator::open(path, config)?))
    }
}

impl<F: FileFormat> StreamParser<F> {
    /// Open a file as a stream, decompressing gzip input
    pub fn open_stream(path: impl AsRef<Path>, format: F, config: &ReaderConfig) -> Result<Self> {
        Ok(Self::new(format, StreamLineIterator::open_stream(path, config)?))
    }
}

impl<F: FileFormat, R: BufRead> DelimitedFileParser<F, StreamLineReader<R>> {
    pub fn from_reader(reader: R, format: F, config: &ReaderConfig) -> Result<Self> {
        Ok(Self::new(format, LineIterator::from_reader(reader, config)?))
    }
}

impl<F: FileFormat, S: LineSource> Iterator for DelimitedFileParser<F, S> {
    type Item = Result<F::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(self.next_record()),
            Ok(false) => None,
            Err(e) => {
                // Fail once, then stop
                self.state = ParserState::Exhausted;
                Some(Err(e))
            }
        }
    }
}
