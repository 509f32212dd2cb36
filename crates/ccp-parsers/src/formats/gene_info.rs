//! NCBI Entrez `gene_info` files
//!
//! Tab separated, 15 columns, `#` header comment, `-` for absent values and
//! `|` between list items.

use super::parse_date;
use crate::format::{ColumnCount, FileFormat};
use crate::splitter::{ColumnSplitter, Columns};
use ccp_common::io::Line;
use ccp_common::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const LIST_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneInfoRecord {
    pub tax_id: u32,
    pub gene_id: u64,
    pub symbol: String,
    pub locus_tag: Option<String>,
    pub synonyms: Vec<String>,
    pub db_xrefs: Vec<String>,
    pub chromosome: Option<String>,
    pub map_location: Option<String>,
    pub description: Option<String>,
    pub type_of_gene: String,
    pub symbol_from_nomenclature_authority: Option<String>,
    pub full_name_from_nomenclature_authority: Option<String>,
    pub nomenclature_status: Option<String>,
    pub other_designations: Vec<String>,
    pub modification_date: NaiveDate,
}

impl GeneInfoRecord {
    /// Identifiers cross-referenced in `database`, e.g. `HGNC` or `Ensembl`
    pub fn xrefs<'a>(&'a self, database: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.db_xrefs.iter().filter_map(move |xref| {
            xref.split_once(':')
                .filter(|(db, _)| *db == database)
                .map(|(_, id)| id)
        })
    }
}

#[derive(Debug, Clone)]
pub struct GeneInfoFormat {
    splitter: ColumnSplitter,
}

impl GeneInfoFormat {
    pub fn new() -> Self {
        Self {
            splitter: ColumnSplitter::tab(),
        }
    }
}

impl Default for GeneInfoFormat {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

impl FileFormat for GeneInfoFormat {
    type Record = GeneInfoRecord;

    fn name(&self) -> &str {
        "gene_info"
    }

    fn comment_prefix(&self) -> Option<&str> {
        Some("#")
    }

    fn splitter(&self) -> &ColumnSplitter {
        &self.splitter
    }

    fn column_count(&self) -> ColumnCount {
        ColumnCount::Exact(15)
    }

    fn parse_record(&self, _line: &Line, columns: &Columns<'_>) -> Result<Self::Record> {
        Ok(GeneInfoRecord {
            tax_id: columns.parse(0, "tax_id")?,
            gene_id: columns.parse(1, "GeneID")?,
            symbol: columns.get(2)?.to_string(),
            locus_tag: owned(columns.optional(3)?),
            synonyms: columns.list(4, LIST_SEPARATOR)?,
            db_xrefs: columns.list(5, LIST_SEPARATOR)?,
            chromosome: owned(columns.optional(6)?),
            map_location: owned(columns.optional(7)?),
            description: owned(columns.optional(8)?),
            type_of_gene: columns.get(9)?.to_string(),
            symbol_from_nomenclature_authority: owned(columns.optional(10)?),
            full_name_from_nomenclature_authority: owned(columns.optional(11)?),
            nomenclature_status: owned(columns.optional(12)?),
            other_designations: columns.list(13, LIST_SEPARATOR)?,
            modification_date: parse_date(columns, 14, "Modification_date")?,
        })
    }
}
