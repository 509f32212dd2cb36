//! Line value objects

use serde::{Deserialize, Serialize};

/// The terminator sequence that ended a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineTerminator {
    /// `\n`
    #[serde(rename = "LF")]
    Lf,
    /// `\r`
    #[serde(rename = "CR")]
    Cr,
    /// `\r\n`
    #[serde(rename = "CRLF")]
    CrLf,
    /// The line ended at end of input without a terminator
    #[serde(rename = "EOF")]
    Eof,
}

impl LineTerminator {
    /// The terminator characters
    pub fn as_str(self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::Cr => "\r",
            LineTerminator::CrLf => "\r\n",
            LineTerminator::Eof => "",
        }
    }

    /// Length in bytes, characters and code points (all three coincide)
    pub fn len(self) -> u64 {
        self.as_str().len() as u64
    }

    pub fn is_empty(self) -> bool {
        self == LineTerminator::Eof
    }
}

impl std::fmt::Display for LineTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineTerminator::Lf => write!(f, "LF"),
            LineTerminator::Cr => write!(f, "CR"),
            LineTerminator::CrLf => write!(f, "CRLF"),
            LineTerminator::Eof => write!(f, "EOF"),
        }
    }
}

/// A physical line as produced by a [`LineSource`](super::LineSource)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    pub terminator: LineTerminator,
    /// Byte position of the first byte of `text`, when the source tracks it
    pub byte_offset: Option<u64>,
}

/// A decoded line together with its position in the input
///
/// Offsets count everything that precedes the line, including the
/// terminators of earlier lines and any skipped comment lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line content without its terminator
    pub text: String,
    pub terminator: LineTerminator,
    /// UTF-16 code units preceding this line
    pub character_offset: u64,
    /// Unicode scalar values preceding this line
    pub code_point_offset: u64,
    /// Zero-based index among surfaced (non-skipped) lines
    pub line_number: u64,
    /// Byte position of the line start, `None` for stream-backed readers
    pub byte_offset: Option<u64>,
}

impl Line {
    pub fn new(
        text: String,
        terminator: LineTerminator,
        character_offset: u64,
        code_point_offset: u64,
        line_number: u64,
        byte_offset: Option<u64>,
    ) -> Self {
        Self {
            text,
            terminator,
            character_offset,
            code_point_offset,
            line_number,
            byte_offset,
        }
    }

    /// UTF-16 code units in `text`, excluding the terminator
    pub fn character_len(&self) -> u64 {
        utf16_len(&self.text)
    }

    /// Unicode scalar values in `text`, excluding the terminator
    pub fn code_point_len(&self) -> u64 {
        self.text.chars().count() as u64
    }

    /// Character offset of the line that follows this one
    pub fn next_character_offset(&self) -> u64 {
        self.character_offset + self.character_len() + self.terminator.len()
    }

    /// Code-point offset of the line that follows this one
    pub fn next_code_point_offset(&self) -> u64 {
        self.code_point_offset + self.code_point_len() + self.terminator.len()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn utf16_len(text: &str) -> u64 {
    text.chars().map(|c| c.len_utf16() as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_lengths() {
        assert_eq!(LineTerminator::Lf.len(), 1);
        assert_eq!(LineTerminator::Cr.len(), 1);
        assert_eq!(LineTerminator::CrLf.len(), 2);
        assert_eq!(LineTerminator::Eof.len(), 0);
        assert!(LineTerminator::Eof.is_empty());
    }

    #[test]
    fn test_supplementary_characters_count_twice_as_code_units() {
        let line = Line::new("a😀b".to_string(), LineTerminator::CrLf, 10, 8, 3, Some(20));
        assert_eq!(line.character_len(), 4);
        assert_eq!(line.code_point_len(), 3);
        assert_eq!(line.next_character_offset(), 16);
        assert_eq!(line.next_code_point_offset(), 13);
    }

    #[test]
    fn test_display_is_text() {
        let line = Line::new("hello".to_string(), LineTerminator::Lf, 0, 0, 0, None);
        assert_eq!(line.to_string(), "hello");
    }
}
