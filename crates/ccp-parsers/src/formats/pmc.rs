//! PubMed Central bulk listings: `oa_file_list.txt` and `PMC-ids.csv`

use super::unquote;
use crate::format::{ColumnCount, FileFormat, HeaderSpec};
use crate::splitter::{ColumnSplitter, Columns};
use ccp_common::io::Line;
use ccp_common::Result;
use serde::{Deserialize, Serialize};

// ============================================================================
// Open access file list
// ============================================================================

/// One package of the PMC open access file list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmcFileListRecord {
    /// Package path relative to the PMC FTP root
    pub ftp_path: String,
    pub citation: String,
    pub pmc_accession: String,
}

impl PmcFileListRecord {
    /// File name of the package, e.g. `PMC13900.tar.gz`
    pub fn package_name(&self) -> &str {
        self.ftp_path.rsplit('/').next().unwrap_or(&self.ftp_path)
    }
}

/// Tab separated, three columns, preceded by a timestamp line
#[derive(Debug, Clone)]
pub struct PmcFileListFormat {
    splitter: ColumnSplitter,
    header: HeaderSpec,
}

impl PmcFileListFormat {
    pub fn new() -> Result<Self> {
        Ok(Self {
            splitter: ColumnSplitter::tab(),
            header: HeaderSpec::new(r"^\d{4}")?,
        })
    }
}

impl FileFormat for PmcFileListFormat {
    type Record = PmcFileListRecord;

    fn name(&self) -> &str {
        "PMC file list"
    }

    fn header(&self) -> Option<&HeaderSpec> {
        Some(&self.header)
    }

    fn splitter(&self) -> &ColumnSplitter {
        &self.splitter
    }

    fn column_count(&self) -> ColumnCount {
        ColumnCount::Exact(3)
    }

    fn parse_record(&self, _line: &Line, columns: &Columns<'_>) -> Result<Self::Record> {
        Ok(PmcFileListRecord {
            ftp_path: columns.get(0)?.to_string(),
            citation: columns.get(1)?.to_string(),
            pmc_accession: columns.get(2)?.to_string(),
        })
    }
}

// ============================================================================
// PMC-ids.csv
// ============================================================================

/// One article of the PMC id mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmcIdsRecord {
    pub journal_title: String,
    pub issn: Option<String>,
    pub eissn: Option<String>,
    pub year: Option<u16>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub page: Option<String>,
    pub doi: Option<String>,
    pub pmcid: String,
    pub pmid: Option<u64>,
    pub manuscript_id: Option<String>,
    pub release_date: Option<String>,
}

/// Comma separated with `"` enclosures, twelve columns, header line first
#[derive(Debug, Clone)]
pub struct PmcIdsFormat {
    splitter: ColumnSplitter,
    header: HeaderSpec,
}

impl PmcIdsFormat {
    pub fn new() -> Result<Self> {
        Ok(Self {
            splitter: ColumnSplitter::literal(",").with_enclosure("\"")?,
            header: HeaderSpec::new(r#"^"?Journal Title"#)?,
        })
    }
}

/// Unquoted value of a column, `None` when empty
fn text(columns: &Columns<'_>, index: usize) -> Result<Option<String>> {
    let value = unquote(columns.get(index)?);
    Ok((!value.is_empty()).then_some(value))
}

fn number<T>(columns: &Columns<'_>, index: usize, field: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = columns.get(index)?;
    text(columns, index)?
        .map(|value| {
            value
                .parse()
                .map_err(|e: T::Err| columns.invalid(field, raw, e.to_string()))
        })
        .transpose()
}

impl FileFormat for PmcIdsFormat {
    type Record = PmcIdsRecord;

    fn name(&self) -> &str {
        "PMC-ids"
    }

    fn header(&self) -> Option<&HeaderSpec> {
        Some(&self.header)
    }

    fn splitter(&self) -> &ColumnSplitter {
        &self.splitter
    }

    fn column_count(&self) -> ColumnCount {
        ColumnCount::Exact(12)
    }

    fn parse_record(&self, _line: &Line, columns: &Columns<'_>) -> Result<Self::Record> {
        let pmcid = text(columns, 8)?
            .ok_or_else(|| columns.invalid("pmcid", "", "PMCID is required"))?;

        Ok(PmcIdsRecord {
            journal_title: unquote(columns.get(0)?),
            issn: text(columns, 1)?,
            eissn: text(columns, 2)?,
            year: number(columns, 3, "year")?,
            volume: text(columns, 4)?,
            issue: text(columns, 5)?,
            page: text(columns, 6)?,
            doi: text(columns, 7)?,
            pmcid,
            pmid: number(columns, 9, "pmid")?,
            manuscript_id: text(columns, 10)?,
            release_date: text(columns, 11)?,
        })
    }
}
