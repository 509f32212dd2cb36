//! Reader configuration
//!
//! Controls how line readers decode and buffer their input. Values can be
//! set programmatically through the builder or taken from the environment.

use crate::encoding::CharacterEncoding;
use crate::error::{CcpError, Result};
use serde::{Deserialize, Serialize};

/// Default size of the random-access read buffer (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration shared by the file-backed and stream-backed line readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Encoding used to decode each line
    pub encoding: CharacterEncoding,

    /// Size in bytes of the internal read buffer
    pub buffer_size: usize,

    /// Lines whose trimmed text starts with this prefix are skipped
    pub skip_prefix: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            encoding: CharacterEncoding::Utf8,
            buffer_size: DEFAULT_BUFFER_SIZE,
            skip_prefix: None,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CCP_ENCODING`: ascii, utf-8 or iso-8859-1
    /// - `CCP_BUFFER_SIZE`: read buffer size in bytes
    /// - `CCP_SKIP_PREFIX`: comment prefix for skipped lines
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(encoding) = std::env::var("CCP_ENCODING") {
            config.encoding = encoding.parse()?;
        }

        if let Ok(size) = std::env::var("CCP_BUFFER_SIZE") {
            config.buffer_size = size
                .parse()
                .map_err(|_| CcpError::Config(format!("Invalid CCP_BUFFER_SIZE: {}", size)))?;
        }

        if let Ok(prefix) = std::env::var("CCP_SKIP_PREFIX") {
            if !prefix.is_empty() {
                config.skip_prefix = Some(prefix);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_encoding(mut self, encoding: CharacterEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefix = Some(prefix.into());
        self
    }

    /// Check that the configuration can be used to open a reader
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(CcpError::Config("Buffer size must be greater than zero".to_string()));
        }
        if matches!(self.skip_prefix.as_deref(), Some("")) {
            return Err(CcpError::Config("Skip prefix must not be empty".to_string()));
        }
        Ok(())
    }
}
