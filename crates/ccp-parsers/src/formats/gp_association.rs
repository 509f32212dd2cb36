//! GO Consortium gene product association (GPAD-style) files
//!
//! Tab separated with 10 to 12 columns and `!` comment lines. Optional trailing
//! columns (annotation extension and properties) may be missing entirely.

use super::parse_date;
use crate::format::{ColumnCount, FileFormat};
use crate::splitter::{ColumnSplitter, Columns};
use ccp_common::io::Line;
use ccp_common::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const NOT_QUALIFIER: &str = "NOT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpAssociationRecord {
    pub db: String,
    pub db_object_id: String,
    pub qualifiers: Vec<String>,
    pub go_id: String,
    pub db_references: Vec<String>,
    pub evidence_code: String,
    pub with_from: Option<String>,
    pub interacting_taxon_id: Option<String>,
    pub date: NaiveDate,
    pub assigned_by: String,
    pub annotation_extension: Option<String>,
    pub annotation_properties: Option<String>,
}

impl GpAssociationRecord {
    /// `db:db_object_id`, e.g. `UniProtKB:P12345`
    pub fn curie(&self) -> String {
        format!("{}:{}", self.db, self.db_object_id)
    }

    /// Whether the association is negated with a `NOT` qualifier
    pub fn is_negated(&self) -> bool {
        self.qualifiers.iter().any(|q| q == NOT_QUALIFIER)
    }
}

#[derive(Debug, Clone)]
pub struct GpAssociationFormat {
    splitter: ColumnSplitter,
}

impl GpAssociationFormat {
    pub fn new() -> Self {
        Self {
            splitter: ColumnSplitter::tab(),
        }
    }
}

impl Default for GpAssociationFormat {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional column that may be missing from the row altogether
fn trailing(columns: &Columns<'_>, index: usize) -> Result<Option<String>> {
    if index >= columns.len() {
        return Ok(None);
    }
    Ok(columns.optional(index)?.map(str::to_string))
}

impl FileFormat for GpAssociationFormat {
    type Record = GpAssociationRecord;

    fn name(&self) -> &str {
        "GP association"
    }

    fn comment_prefix(&self) -> Option<&str> {
        Some("!")
    }

    fn splitter(&self) -> &ColumnSplitter {
        &self.splitter
    }

    fn column_count(&self) -> ColumnCount {
        ColumnCount::Range { min: 10, max: 12 }
    }

    fn parse_record(&self, _line: &Line, columns: &Columns<'_>) -> Result<Self::Record> {
        let go_id = columns.get(3)?;
        if !go_id.starts_with("GO:") {
            return Err(columns.invalid("GO_ID", go_id, "expected a GO: identifier"));
        }

        Ok(GpAssociationRecord {
            db: columns.get(0)?.to_string(),
            db_object_id: columns.get(1)?.to_string(),
            qualifiers: columns.list(2, '|')?,
            go_id: go_id.to_string(),
            db_references: columns.list(4, '|')?,
            evidence_code: columns.get(5)?.to_string(),
            with_from: columns.optional(6)?.map(str::to_string),
            interacting_taxon_id: columns.optional(7)?.map(str::to_string),
            date: parse_date(columns, 8, "Date")?,
            assigned_by: columns.get(9)?.to_string(),
            annotation_extension: trailing(columns, 10)?,
            annotation_properties: trailing(columns, 11)?,
        })
    }
}
