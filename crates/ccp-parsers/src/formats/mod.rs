//! Built-in file format bindings

pub mod delimited;
pub mod gene_info;
pub mod gp_association;
pub mod pmc;

pub use delimited::DelimitedFormat;
pub use gene_info::{GeneInfoFormat, GeneInfoRecord};
pub use gp_association::{GpAssociationFormat, GpAssociationRecord};
pub use pmc::{PmcFileListFormat, PmcFileListRecord, PmcIdsFormat, PmcIdsRecord};

use crate::splitter::Columns;
use ccp_common::Result;
use chrono::NaiveDate;

/// Parse a `YYYYMMDD` column
pub(crate) fn parse_date(columns: &Columns<'_>, index: usize, field: &str) -> Result<NaiveDate> {
    let value = columns.get(index)?;
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d")
        .map_err(|e| columns.invalid(field, value, e.to_string()))
}

/// Strip one pair of enclosing `"` and undo `""` escaping
pub(crate) fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ccp_common::io::{Line, LineTerminator};
    use ccp_common::CcpError;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""Nature, London""#), "Nature, London");
        assert_eq!(unquote(r#""say ""hi""""#), r#"say "hi""#);
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote(r#""""#), "");
    }

    #[test]
    fn test_parse_date() {
        let line = Line::new("20240115\t2024-01-15".to_string(), LineTerminator::Lf, 0, 0, 7, None);
        let columns = Columns::new(&line, vec!["20240115", "2024-01-15"]);

        assert_eq!(
            parse_date(&columns, 0, "date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(matches!(
            parse_date(&columns, 1, "date"),
            Err(CcpError::InvalidField { line_number: 7, .. })
        ));
    }
}
