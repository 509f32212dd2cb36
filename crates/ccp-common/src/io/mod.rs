//! Line-oriented readers with offset tracking
//!
//! - [`BufferedRandomAccessFile`]: seekable, buffered byte access plus line
//!   extraction with LF / CR / CRLF detection
//! - [`StreamLineReader`]: the same line extraction over any `BufRead`
//! - [`LineIterator`]: turns either source into a sequence of [`Line`]s,
//!   skipping comment lines and tracking character, code-point and byte
//!   offsets
//!
//! # Example
//!
//! ```no_run
//! use ccp_common::config::ReaderConfig;
//! use ccp_common::io::LineIterator;
//!
//! fn main() -> ccp_common::Result<()> {
//!     let config = ReaderConfig::new().with_skip_prefix("#");
//!     for line in LineIterator::open("gene_info", &config)? {
//!         let line = line?;
//!         println!("{} @ {:?}: {}", line.line_number, line.byte_offset, line.text);
//!     }
//!     Ok(())
//! }
//! ```

mod buffered;
mod iterator;
mod line;
mod stream;

pub use buffered::BufferedRandomAccessFile;
pub use iterator::{FileLineIterator, LineIterator, StreamLineIterator};
pub use line::{Line, LineTerminator, RawLine};
pub use stream::StreamLineReader;

use crate::error::Result;

/// Producer of physical lines for a [`LineIterator`]
pub trait LineSource {
    /// Read the next physical line, `None` at end of input
    fn read_raw_line(&mut self) -> Result<Option<RawLine>>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_raw_line(&mut self) -> Result<Option<RawLine>> {
        (**self).read_raw_line()
    }
}
