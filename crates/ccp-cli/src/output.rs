//! JSON Lines output

use anyhow::{Context, Result};
use serde::Serialize;
use serde_jsonlines::JsonLinesWriter;
use std::io::Write;

/// Write each item as one JSON document per line, returning the count
///
/// Stops at the first item error. `limit` caps the number of items pulled
/// from the iterator.
pub fn write_json_lines<I, T, W>(items: I, limit: Option<usize>, out: &mut W) -> Result<u64>
where
    I: IntoIterator<Item = ccp_common::Result<T>>,
    T: Serialize,
    W: Write,
{
    let mut writer = JsonLinesWriter::new(out);
    let mut written = 0;
    for item in items.into_iter().take(limit.unwrap_or(usize::MAX)) {
        let item = item.with_context(|| format!("Failed after {} records", written))?;
        writer.write(&item).context("Failed to write record")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
