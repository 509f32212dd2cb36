//! Error types for CCP

use thiserror::Error;

/// Result type alias for CCP operations
pub type Result<T> = std::result::Result<T, CcpError>;

/// Main error type for CCP
#[derive(Error, Debug)]
pub enum CcpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes that are not valid in the configured character encoding
    #[error("Malformed {encoding} input in line starting at byte {offset}: {message}")]
    Decode {
        encoding: String,
        offset: u64,
        message: String,
    },

    /// The first line of a file does not look like the expected header
    #[error(
        "File format change detected in {format} file: expected first line matching '{expected}', found {found:?}"
    )]
    FormatDrift {
        format: String,
        expected: String,
        found: Option<String>,
    },

    #[error("Expected {expected} columns but found {actual} on line {line_number}: {line:?}")]
    ColumnCount {
        expected: String,
        actual: usize,
        line_number: u64,
        line: String,
    },

    #[error("Column index {index} out of bounds, line has {column_count} columns: {line:?}")]
    ColumnIndex {
        index: usize,
        column_count: usize,
        line: String,
    },

    #[error("Invalid value {value:?} for {field} on line {line_number}: {message}")]
    InvalidField {
        field: String,
        value: String,
        line_number: u64,
        message: String,
    },

    #[error("No more elements")]
    NoSuchElement,

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<zip::result::ZipError> for CcpError {
    fn from(err: zip::result::ZipError) -> Self {
        CcpError::Archive(err.to_string())
    }
}
