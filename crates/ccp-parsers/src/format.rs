//! File format descriptions consumed by [`DelimitedFileParser`](crate::DelimitedFileParser)

use crate::splitter::{ColumnSplitter, Columns};
use ccp_common::io::Line;
use ccp_common::Result;
use regex::Regex;
use std::fmt;

/// How many columns a record line must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCount {
    Exact(usize),
    Range { min: usize, max: usize },
    Any,
}

impl ColumnCount {
    pub fn accepts(self, actual: usize) -> bool {
        match self {
            ColumnCount::Exact(n) => actual == n,
            ColumnCount::Range { min, max } => (min..=max).contains(&actual),
            ColumnCount::Any => true,
        }
    }
}

impl fmt::Display for ColumnCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnCount::Exact(n) => write!(f, "exactly {}", n),
            ColumnCount::Range { min, max } => write!(f, "between {} and {}", min, max),
            ColumnCount::Any => write!(f, "any number of"),
        }
    }
}

/// Pattern the first surfaced line of a file must match
#[derive(Debug, Clone)]
pub struct HeaderSpec {
    pattern: Regex,
}

impl HeaderSpec {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A line-per-record file layout and the mapping from columns to a record
pub trait FileFormat {
    type Record;

    /// Human-readable name used in errors and logs
    fn name(&self) -> &str;

    /// Header line consumed and checked before the first record
    fn header(&self) -> Option<&HeaderSpec> {
        None
    }

    /// Lines whose trimmed text starts with this prefix are skipped
    fn comment_prefix(&self) -> Option<&str> {
        None
    }

    fn splitter(&self) -> &ColumnSplitter;

    fn column_count(&self) -> ColumnCount;

    /// Convert a line whose column count was already validated
    fn parse_record(&self, line: &Line, columns: &Columns<'_>) -> Result<Self::Record>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_accepts() {
        assert!(ColumnCount::Exact(3).accepts(3));
        assert!(!ColumnCount::Exact(3).accepts(4));
        assert!(ColumnCount::Range { min: 10, max: 12 }.accepts(11));
        assert!(!ColumnCount::Range { min: 10, max: 12 }.accepts(9));
        assert!(ColumnCount::Any.accepts(0));
    }

    #[test]
    fn test_column_count_display() {
        assert_eq!(ColumnCount::Exact(15).to_string(), "exactly 15");
        assert_eq!(ColumnCount::Range { min: 10, max: 12 }.to_string(), "between 10 and 12");
    }

    #[test]
    fn test_header_spec() {
        let header = HeaderSpec::new(r"^\d{4}").unwrap();
        assert!(header.matches("2026-10-17 03:12:44"));
        assert!(!header.matches("oa_package/00/00/PMC13900.tar.gz"));
        assert_eq!(header.pattern(), r"^\d{4}");
        assert!(HeaderSpec::new("[").is_err());
    }
}
