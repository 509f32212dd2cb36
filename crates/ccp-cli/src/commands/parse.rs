//! `ccp parse` command implementation

use crate::output::write_json_lines;
use crate::{FormatArg, ParseArgs};
use anyhow::{Context, Result};
use ccp_common::ReaderConfig;
use ccp_parsers::formats::{GeneInfoFormat, GpAssociationFormat, PmcFileListFormat, PmcIdsFormat};
use ccp_parsers::{DelimitedFileParser, FileFormat};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Parse the file with the selected format and write one JSON record per line
pub fn run(args: &ParseArgs, out: &mut impl Write) -> Result<u64> {
    let config = super::reader_config(&args.reader, None)?;

    let written = match args.format {
        FormatArg::GeneInfo => emit(GeneInfoFormat::new(), args, &config, out)?,
        FormatArg::PmcFileList => emit(PmcFileListFormat::new()?, args, &config, out)?,
        FormatArg::PmcIds => emit(PmcIdsFormat::new()?, args, &config, out)?,
        FormatArg::GpAssociation => emit(GpAssociationFormat::new(), args, &config, out)?,
    };

    info!(
        format = ?args.format,
        path = %args.path.display(),
        records = written,
        "Parsed records"
    );
    Ok(written)
}

fn emit<F>(format: F, args: &ParseArgs, config: &ReaderConfig, out: &mut impl Write) -> Result<u64>
where
    F: FileFormat,
    F::Record: Serialize,
{
    let path = &args.path;
    let name = format.name().to_string();

    let written = if args.reader.stream {
        let parser = DelimitedFileParser::open_stream(path, format, config)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        write_json_lines(parser, args.limit, out)
    } else {
        let parser = DelimitedFileParser::open(path, format, config)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        write_json_lines(parser, args.limit, out)
    };
    written.with_context(|| format!("Failed to parse {} file {}", name, path.display()))
}
