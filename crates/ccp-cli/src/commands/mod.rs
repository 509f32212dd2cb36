//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function writing its
//! results to the given output.

pub mod checksum;
pub mod lines;
pub mod parse;
pub mod unpack;

use crate::ReaderArgs;
use anyhow::{Context, Result};
use ccp_common::ReaderConfig;

/// Environment defaults overridden by command-line flags
pub(crate) fn reader_config(
    args: &ReaderArgs,
    skip_prefix: Option<&str>,
) -> Result<ReaderConfig> {
    let mut config =
        ReaderConfig::from_env().context("Invalid reader configuration in environment")?;
    if let Some(encoding) = args.encoding {
        config = config.with_encoding(encoding);
    }
    if let Some(size) = args.buffer_size {
        config = config.with_buffer_size(size);
    }
    if let Some(prefix) = skip_prefix {
        config = config.with_skip_prefix(prefix);
    }
    config.validate()?;
    Ok(config)
}
