//! Column splitting with optional enclosure markers

use ccp_common::io::Line;
use ccp_common::{CcpError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::str::FromStr;

const PLACEHOLDER: u8 = 0;

#[derive(Debug, Clone)]
enum Delimiter {
    Literal(String),
    Pattern(Regex),
}

/// Splits a line into column tokens
///
/// Delimiters inside an enclosed span (`"a, b"` with a `"` marker) are not
/// treated as separators. Tokens are cut from the original text, so enclosure
/// markers stay in the returned values. Trailing empty tokens are kept.
#[derive(Debug, Clone)]
pub struct ColumnSplitter {
    delimiter: Delimiter,
    enclosure: Option<Regex>,
}

impl ColumnSplitter {
    /// Split on an exact delimiter string
    pub fn literal(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: Delimiter::Literal(delimiter.into()),
            enclosure: None,
        }
    }

    pub fn tab() -> Self {
        Self::literal("\t")
    }

    /// Split on every non-empty match of `pattern`
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self {
            delimiter: Delimiter::Pattern(Regex::new(pattern)?),
            enclosure: None,
        })
    }

    /// Protect spans opened and closed by `marker` from splitting
    pub fn with_enclosure(mut self, marker: &str) -> Result<Self> {
        if marker.is_empty() {
            return Err(CcpError::Config("Enclosure marker must not be empty".to_string()));
        }
        let marker = regex::escape(marker);
        self.enclosure = Some(Regex::new(&format!("(?s){marker}.*?{marker}"))?);
        Ok(self)
    }

    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let spans = self.enclosed_spans(text);
        let masked = mask(text, &spans);

        let mut tokens = Vec::new();
        let mut start = 0;
        for range in self.delimiter_matches(&masked, &spans) {
            tokens.push(&text[start..range.start]);
            start = range.end;
        }
        tokens.push(&text[start..]);
        tokens
    }

    fn enclosed_spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.enclosure {
            Some(enclosure) => enclosure.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }

    fn delimiter_matches(&self, masked: &str, spans: &[Range<usize>]) -> Vec<Range<usize>> {
        let candidates: Vec<Range<usize>> = match &self.delimiter {
            Delimiter::Literal(d) if d.is_empty() => Vec::new(),
            Delimiter::Literal(d) => masked
                .match_indices(d.as_str())
                .map(|(i, m)| i..i + m.len())
                .collect(),
            Delimiter::Pattern(re) => re
                .find_iter(masked)
                .filter(|m| !m.is_empty())
                .map(|m| m.range())
                .collect(),
        };

        // Only a delimiter that itself matches the placeholder can land here
        candidates
            .into_iter()
            .filter(|d| !spans.iter().any(|span| d.start < span.end && span.start < d.end))
            .collect()
    }
}

/// Replace every byte of the enclosed spans with an equal-length placeholder
///
/// Spans start and end on char boundaries, so the result is valid UTF-8 and
/// byte offsets in it are offsets into `text`.
fn mask<'t>(text: &'t str, spans: &[Range<usize>]) -> Cow<'t, str> {
    if spans.is_empty() {
        return Cow::Borrowed(text);
    }
    let mut bytes = text.as_bytes().to_vec();
    for span in spans {
        bytes[span.clone()].fill(PLACEHOLDER);
    }
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

impl FromStr for ColumnSplitter {
    type Err = CcpError;

    /// `tab`, `\t` or `comma` by name; anything else is used literally
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "tab" | "\\t" => Self::tab(),
            "comma" => Self::literal(","),
            _ => Self::literal(s),
        })
    }
}

/// The tokens of one line, with typed accessors
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    line: &'a Line,
    values: Vec<&'a str>,
}

impl<'a> Columns<'a> {
    pub fn new(line: &'a Line, values: Vec<&'a str>) -> Self {
        Self { line, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn line(&self) -> &'a Line {
        self.line
    }

    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    /// Column `index`, failing when the row is shorter
    pub fn get(&self, index: usize) -> Result<&'a str> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| CcpError::ColumnIndex {
                index,
                column_count: self.values.len(),
                line: self.line.text.clone(),
            })
    }

    /// Column `index` with `-` and empty values mapped to `None`
    pub fn optional(&self, index: usize) -> Result<Option<&'a str>> {
        let value = self.get(index)?;
        Ok(match value {
            "" | "-" => None,
            _ => Some(value),
        })
    }

    /// Column `index` split on `separator`, empty for an absent value
    pub fn list(&self, index: usize, separator: char) -> Result<Vec<String>> {
        Ok(self
            .optional(index)?
            .map(|value| {
                value
                    .split(separator)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Column `index` converted with `FromStr`
    pub fn parse<T>(&self, index: usize, field: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.get(index)?;
        self.convert(field, value)
    }

    /// Like [`Columns::parse`], with absent values mapped to `None`
    pub fn parse_optional<T>(&self, index: usize, field: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(index)?
            .map(|value| self.convert(field, value))
            .transpose()
    }

    /// An [`CcpError::InvalidField`] for a value of this row
    pub fn invalid(&self, field: &str, value: &str, message: impl Into<String>) -> CcpError {
        CcpError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
            line_number: self.line.line_number,
            message: message.into(),
        }
    }

    fn convert<T>(&self, field: &str, value: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| self.invalid(field, value, e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ccp_common::io::LineTerminator;

    fn line(text: &str) -> Line {
        Line::new(text.to_string(), LineTerminator::Lf, 0, 0, 4, Some(0))
    }

    #[test]
    fn test_split_tab_keeps_trailing_empty_tokens() {
        assert_eq!(ColumnSplitter::tab().split("a\tb\t\t"), vec!["a", "b", "", ""]);
        assert_eq!(ColumnSplitter::tab().split(""), vec![""]);
    }

    #[test]
    fn test_split_with_enclosure() {
        let splitter = ColumnSplitter::literal(",").with_enclosure("\"").unwrap();
        let tokens = splitter.split(r#""Nature, London",0028-0836,,"2001""#);
        assert_eq!(tokens, vec![r#""Nature, London""#, "0028-0836", "", r#""2001""#]);
    }

    #[test]
    fn test_split_unbalanced_enclosure_is_not_masked() {
        let splitter = ColumnSplitter::literal(",").with_enclosure("\"").unwrap();
        assert_eq!(splitter.split(r#"a,"b,c"#), vec!["a", "\"b", "c"]);
    }

    #[test]
    fn test_split_regex_delimiter_next_to_enclosure() {
        let splitter = ColumnSplitter::regex(r",\s*").unwrap().with_enclosure("'").unwrap();
        assert_eq!(splitter.split("a, 'b, c',d"), vec!["a", "'b, c'", "d"]);
        assert_eq!(splitter.split("'é, ü', x"), vec!["'é, ü'", "x"]);
    }

    #[test]
    fn test_split_regex_delimiter() {
        let splitter = ColumnSplitter::regex(r"\s*;\s*").unwrap();
        assert_eq!(splitter.split("x ; y;z"), vec!["x", "y", "z"]);
        assert!(ColumnSplitter::regex("(").is_err());
    }

    #[test]
    fn test_splitter_from_str() {
        let splitter: ColumnSplitter = "tab".parse().unwrap();
        assert_eq!(splitter.split("a\tb"), vec!["a", "b"]);
        let splitter: ColumnSplitter = "|".parse().unwrap();
        assert_eq!(splitter.split("a|b"), vec!["a", "b"]);
    }

    #[test]
    fn test_columns_accessors() {
        let line = line("9606\t-\tA|B||C\tx");
        let columns = Columns::new(&line, ColumnSplitter::tab().split(&line.text));

        assert_eq!(columns.len(), 4);
        assert_eq!(columns.parse::<u32>(0, "tax_id").unwrap(), 9606);
        assert_eq!(columns.optional(1).unwrap(), None);
        assert_eq!(columns.list(1, '|').unwrap(), Vec::<String>::new());
        assert_eq!(columns.list(2, '|').unwrap(), vec!["A", "B", "C"]);
        assert_eq!(columns.parse_optional::<u32>(1, "gene_id").unwrap(), None);
    }

    #[test]
    fn test_columns_missing_index() {
        let line = line("a\tb");
        let columns = Columns::new(&line, ColumnSplitter::tab().split(&line.text));
        match columns.get(5) {
            Err(CcpError::ColumnIndex {
                index,
                column_count,
                line,
            }) => {
                assert_eq!(index, 5);
                assert_eq!(column_count, 2);
                assert_eq!(line, "a\tb");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_columns_invalid_field() {
        let line = line("abc");
        let columns = Columns::new(&line, vec!["abc"]);
        match columns.parse::<u64>(0, "gene_id") {
            Err(CcpError::InvalidField {
                field,
                value,
                line_number,
                ..
            }) => {
                assert_eq!(field, "gene_id");
                assert_eq!(value, "abc");
                assert_eq!(line_number, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
