//! CCP CLI Library
//!
//! Command-line front end for the CCP readers and parsers.
//!
//! - **Lines**: dump offset-tracked lines of a file as JSON (`ccp lines`)
//! - **Parse**: parse a known bulk data file into JSON records (`ccp parse`)
//! - **Unpack**: extract gzip, tar, tar.gz and zip archives (`ccp unpack`)
//! - **Checksum**: print a file digest (`ccp checksum`)

pub mod commands;
pub mod output;

use ccp_common::fileutil::ChecksumAlgorithm;
use ccp_common::CharacterEncoding;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CCP - streaming readers for large line-oriented data files
#[derive(Parser, Debug)]
#[command(name = "ccp")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every line of a file as a JSON object
    Lines(LinesArgs),

    /// Parse a bulk data file into JSON records
    Parse(ParseArgs),

    /// Extract an archive into a directory
    Unpack {
        /// gzip, tar, tar.gz or zip archive
        archive: PathBuf,

        /// Destination directory (created if missing)
        dest: PathBuf,
    },

    /// Print the checksum of a file
    Checksum {
        path: PathBuf,

        /// Digest algorithm
        #[arg(short, long, default_value = "sha256")]
        algorithm: ChecksumAlgorithm,
    },
}

/// Reader options shared by commands that read lines
#[derive(Args, Debug, Clone, Default)]
pub struct ReaderArgs {
    /// Character encoding (ascii, utf-8, iso-8859-1); defaults to CCP_ENCODING or utf-8
    #[arg(short, long)]
    pub encoding: Option<CharacterEncoding>,

    /// Read buffer size in bytes
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Read sequentially, decompressing gzip input (no byte offsets)
    #[arg(long)]
    pub stream: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LinesArgs {
    pub path: PathBuf,

    /// Skip lines whose trimmed text starts with this prefix
    #[arg(short, long)]
    pub skip_prefix: Option<String>,

    #[command(flatten)]
    pub reader: ReaderArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// File format
    #[arg(value_enum)]
    pub format: FormatArg,

    pub path: PathBuf,

    /// Stop after this many records
    #[arg(short, long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub reader: ReaderArgs,
}

/// Formats understood by `ccp parse`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// NCBI Entrez gene_info
    GeneInfo,
    /// PMC open access oa_file_list.txt
    PmcFileList,
    /// PMC-ids.csv
    PmcIds,
    /// GO gene product association
    GpAssociation,
}
