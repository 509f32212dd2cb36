//! `ccp lines` command implementation

use crate::output::write_json_lines;
use crate::LinesArgs;
use anyhow::{Context, Result};
use ccp_common::io::{FileLineIterator, StreamLineIterator};
use std::io::Write;
use tracing::info;

/// Write every surfaced line of the file as JSON
pub fn run(args: &LinesArgs, out: &mut impl Write) -> Result<u64> {
    let config = super::reader_config(&args.reader, args.skip_prefix.as_deref())?;
    let path = &args.path;

    let (written, skipped) = if args.reader.stream {
        let mut lines = StreamLineIterator::open_stream(path, &config)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let written = write_json_lines(&mut lines, None, out)?;
        (written, lines.skipped_lines())
    } else {
        let mut lines = FileLineIterator::open(path, &config)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let written = write_json_lines(&mut lines, None, out)?;
        (written, lines.skipped_lines())
    };

    info!(path = %path.display(), lines = written, skipped, "Read lines");
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ReaderArgs;

    #[test]
    fn test_lines_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "#skip\nab\r\ncd").unwrap();

        let args = LinesArgs {
            path,
            skip_prefix: Some("#".to_string()),
            reader: ReaderArgs::default(),
        };
        let mut out = Vec::new();
        assert_eq!(run(&args, &mut out).unwrap(), 2);

        let rows: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows[0]["text"], "ab");
        assert_eq!(rows[0]["terminator"], "CRLF");
        assert_eq!(rows[0]["byte_offset"], 6);
        assert_eq!(rows[1]["line_number"], 1);
        assert_eq!(rows[1]["terminator"], "EOF");
    }

    #[test]
    fn test_lines_stream_has_no_byte_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "x\n").unwrap();

        let args = LinesArgs {
            path,
            skip_prefix: None,
            reader: ReaderArgs {
                stream: true,
                ..ReaderArgs::default()
            },
        };
        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        let row: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(row["byte_offset"].is_null());
    }
}
