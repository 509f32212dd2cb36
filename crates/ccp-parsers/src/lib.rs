//! CCP Parsers
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Record parsers for line-per-record delimited files on top of the
//! `ccp_common` line iterators.
//!
//! A [`FileFormat`] describes the layout (delimiter, enclosure, column count,
//! comment prefix, header) and maps validated [`Columns`] to a record.
//! [`DelimitedFileParser`] drives any format over a file or stream.
//!
//! # Example
//!
//! ```no_run
//! use ccp_common::config::ReaderConfig;
//! use ccp_parsers::formats::GeneInfoFormat;
//! use ccp_parsers::DelimitedFileParser;
//!
//! fn human_genes(path: &str) -> ccp_common::Result<usize> {
//!     let config = ReaderConfig::default();
//!     let parser = DelimitedFileParser::open(path, GeneInfoFormat::new(), &config)?;
//!     let mut count = 0;
//!     for gene in parser {
//!         if gene?.tax_id == 9606 {
//!             count += 1;
//!         }
//!     }
//!     Ok(count)
//! }
//! ```

pub mod format;
pub mod formats;
pub mod parser;
pub mod splitter;

pub use format::{ColumnCount, FileFormat, HeaderSpec};
pub use parser::{DelimitedFileParser, FileParser, ParserState, StreamParser};
pub use splitter::{ColumnSplitter, Columns};
