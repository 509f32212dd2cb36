//! CCP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Building blocks for streaming large line-oriented data files.
//!
//! # Overview
//!
//! - **I/O**: buffered random-access reader, stream reader and the
//!   skip-aware [`LineIterator`](io::LineIterator) producing offset-tracked
//!   [`Line`](io::Line)s
//! - **Encodings**: strict ASCII / UTF-8 / ISO-8859-1 decoding
//! - **Configuration**: [`ReaderConfig`](config::ReaderConfig)
//! - **Error Handling**: [`CcpError`] and [`Result`]
//! - **Files and archives**: gzip-transparent opening, checksums, tar / zip
//!   extraction
//! - **Logging**: `tracing` subscriber setup for binaries
//!
//! # Example
//!
//! ```no_run
//! use ccp_common::config::ReaderConfig;
//! use ccp_common::io::LineIterator;
//! use ccp_common::Result;
//!
//! fn longest_line(path: &str) -> Result<usize> {
//!     let mut longest = 0;
//!     for line in LineIterator::open(path, &ReaderConfig::default())? {
//!         longest = longest.max(line?.text.len());
//!     }
//!     Ok(longest)
//! }
//! ```

pub mod archive;
pub mod config;
pub mod encoding;
pub mod error;
pub mod fileutil;
pub mod io;
pub mod logging;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use encoding::CharacterEncoding;
pub use error::{CcpError, Result};
