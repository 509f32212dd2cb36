//! Character encodings supported by the line readers
//!
//! Decoding is strict: bytes that are not valid in the selected encoding
//! produce [`CcpError::Decode`] instead of replacement characters.

use crate::error::{CcpError, Result};
use serde::{Deserialize, Serialize};

/// Character encoding used to turn raw line bytes into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterEncoding {
    /// 7-bit US-ASCII
    Ascii,
    /// UTF-8
    #[default]
    Utf8,
    /// ISO-8859-1 (Latin-1), every byte maps to the code point of equal value
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
}

impl CharacterEncoding {
    /// Canonical name of the encoding
    pub fn name(self) -> &'static str {
        match self {
            CharacterEncoding::Ascii => "US-ASCII",
            CharacterEncoding::Utf8 => "UTF-8",
            CharacterEncoding::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Decode `bytes` into a `String`
    ///
    /// `offset` is the absolute byte position of `bytes[0]` and is only used
    /// for error reporting.
    pub fn decode(self, bytes: &[u8], offset: u64) -> Result<String> {
        match self {
            CharacterEncoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(self.malformed(
                    offset,
                    format!("byte 0x{:02x} at position {} is not ASCII", bytes[pos], pos),
                )),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
            CharacterEncoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(self.malformed(offset, e.to_string())),
            },
            CharacterEncoding::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    fn malformed(self, offset: u64, message: String) -> CcpError {
        CcpError::Decode {
            encoding: self.name().to_string(),
            offset,
            message,
        }
    }
}

impl std::str::FromStr for CharacterEncoding {
    type Err = CcpError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ascii" | "us-ascii" => Ok(CharacterEncoding::Ascii),
            "utf-8" | "utf8" => Ok(CharacterEncoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(CharacterEncoding::Iso8859_1),
            _ => Err(CcpError::Config(format!("Unsupported character encoding: {}", s))),
        }
    }
}

impl std::fmt::Display for CharacterEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Growable byte accumulator for a single line
#[derive(Debug, Default, Clone)]
pub struct ByteList {
    bytes: Vec<u8>,
}

impl ByteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the accumulated bytes, see [`CharacterEncoding::decode`]
    pub fn decode(&self, encoding: CharacterEncoding, offset: u64) -> Result<String> {
        encoding.decode(&self.bytes, offset)
    }
}
