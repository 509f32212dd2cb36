//! Ad-hoc delimited format yielding raw column values

use crate::format::{ColumnCount, FileFormat, HeaderSpec};
use crate::splitter::{ColumnSplitter, Columns};
use ccp_common::io::Line;
use ccp_common::Result;

/// A format assembled at runtime; records are the column tokens as-is
#[derive(Debug, Clone)]
pub struct DelimitedFormat {
    name: String,
    splitter: ColumnSplitter,
    column_count: ColumnCount,
    comment_prefix: Option<String>,
    header: Option<HeaderSpec>,
}

impl DelimitedFormat {
    pub fn new(name: impl Into<String>, splitter: ColumnSplitter) -> Self {
        Self {
            name: name.into(),
            splitter,
            column_count: ColumnCount::Any,
            comment_prefix: None,
            header: None,
        }
    }

    /// Tab separated, any column count
    pub fn tsv() -> Self {
        Self::new("tsv", ColumnSplitter::tab())
    }

    pub fn with_column_count(mut self, column_count: ColumnCount) -> Self {
        self.column_count = column_count;
        self
    }

    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = Some(prefix.into());
        self
    }

    pub fn with_header(mut self, pattern: &str) -> Result<Self> {
        self.header = Some(HeaderSpec::new(pattern)?);
        Ok(self)
    }
}

impl FileFormat for DelimitedFormat {
    type Record = Vec<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn header(&self) -> Option<&HeaderSpec> {
        self.header.as_ref()
    }

    fn comment_prefix(&self) -> Option<&str> {
        self.comment_prefix.as_deref()
    }

    fn splitter(&self) -> &ColumnSplitter {
        &self.splitter
    }

    fn column_count(&self) -> ColumnCount {
        self.column_count
    }

    fn parse_record(&self, _line: &Line, columns: &Columns<'_>) -> Result<Vec<String>> {
        Ok(columns.values().iter().map(|v| v.to_string()).collect())
    }
}
