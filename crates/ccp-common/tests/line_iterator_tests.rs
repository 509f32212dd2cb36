//! Integration tests for the file- and stream-backed line iterators
//!
//! Property tests check that lines plus terminators reconstruct the input
//! exactly and that offsets agree with that reconstruction.

use ccp_common::config::ReaderConfig;
use ccp_common::io::{BufferedRandomAccessFile, Line, LineIterator, LineTerminator};
use ccp_common::{CcpError, CharacterEncoding};
use flate2::write::GzEncoder;
use flate2::Compression;
use proptest::prelude::*;
use std::io::{Cursor, Write};

fn collect_file(content: &[u8], buffer_size: usize, skip: Option<&str>) -> Vec<Line> {
    let reader = BufferedRandomAccessFile::from_reader(
        Cursor::new(content.to_vec()),
        CharacterEncoding::Utf8,
        buffer_size,
    )
    .unwrap();
    LineIterator::new(reader, skip.map(str::to_string))
        .map(|line| line.unwrap())
        .collect()
}

fn collect_stream(content: &[u8], skip: Option<&str>) -> Vec<Line> {
    let mut config = ReaderConfig::default();
    config.skip_prefix = skip.map(str::to_string);
    LineIterator::from_reader(Cursor::new(content.to_vec()), &config)
        .unwrap()
        .map(|line| line.unwrap())
        .collect()
}

fn terminator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("\r"), Just("\r\n")]
}

fn document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(("[a-z#é😀\t ]{0,6}", terminator()), 0..12),
        "[a-z😀]{0,4}",
    )
        .prop_map(|(lines, tail)| {
            let mut doc = String::new();
            for (text, term) in lines {
                doc.push_str(&text);
                doc.push_str(term);
            }
            doc.push_str(&tail);
            doc
        })
}

proptest! {
    #[test]
    fn lines_reconstruct_input(doc in document(), buffer_size in 1usize..9) {
        let lines = collect_file(doc.as_bytes(), buffer_size, None);

        let mut rebuilt = String::new();
        for (i, line) in lines.iter().enumerate() {
            prop_assert_eq!(line.line_number, i as u64);
            prop_assert_eq!(line.byte_offset, Some(rebuilt.len() as u64));
            prop_assert_eq!(line.character_offset, rebuilt.encode_utf16().count() as u64);
            prop_assert_eq!(line.code_point_offset, rebuilt.chars().count() as u64);
            prop_assert!(line.code_point_offset <= line.character_offset);
            rebuilt.push_str(&line.text);
            rebuilt.push_str(line.terminator.as_str());
        }
        prop_assert_eq!(rebuilt, doc);
    }

    #[test]
    fn stream_and_file_agree(doc in document(), buffer_size in 1usize..9) {
        let from_file = collect_file(doc.as_bytes(), buffer_size, Some("#"));
        let from_stream = collect_stream(doc.as_bytes(), Some("#"));

        prop_assert_eq!(from_file.len(), from_stream.len());
        for (f, s) in from_file.iter().zip(from_stream.iter()) {
            prop_assert_eq!(&f.text, &s.text);
            prop_assert_eq!(f.terminator, s.terminator);
            prop_assert_eq!(f.character_offset, s.character_offset);
            prop_assert_eq!(f.code_point_offset, s.code_point_offset);
            prop_assert_eq!(f.line_number, s.line_number);
            prop_assert!(s.byte_offset.is_none());
        }
    }

    #[test]
    fn byte_offsets_are_monotonic_with_skipping(doc in document(), buffer_size in 1usize..9) {
        let lines = collect_file(doc.as_bytes(), buffer_size, Some("#"));
        for pair in lines.windows(2) {
            prop_assert!(pair[0].byte_offset <= pair[1].byte_offset);
            prop_assert_eq!(pair[0].line_number + 1, pair[1].line_number);
        }
        for line in &lines {
            prop_assert!(!line.text.trim().starts_with('#'));
        }
    }
}

#[test]
fn test_open_file_with_comments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gene_info");
    std::fs::write(
        &path,
        "#tax_id\tGeneID\tSymbol\n9606\t1\tA1BG\n#interleaved\n9606\t2\tA2M\n",
    )
    .unwrap();

    let config = ReaderConfig::new().with_skip_prefix("#").with_buffer_size(7);
    let lines: Vec<Line> = LineIterator::open(&path, &config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "9606\t1\tA1BG");
    assert_eq!(lines[0].byte_offset, Some(22));
    assert_eq!(lines[1].text, "9606\t2\tA2M");
    assert_eq!(lines[1].line_number, 1);
    assert_eq!(lines[1].byte_offset, Some(47));
}

#[test]
fn test_open_missing_file() {
    let result = LineIterator::open("/definitely/not/here.txt", &ReaderConfig::default());
    assert!(matches!(result, Err(CcpError::Io(_))));
}

#[test]
fn test_open_stream_reads_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oa_file_list.txt.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"2026-01-01 00:00:00\r\nrow one\r\n").unwrap();
    encoder.finish().unwrap();

    let lines: Vec<Line> = LineIterator::open_stream(&path, &ReaderConfig::default())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].text, "row one");
    assert_eq!(lines[1].terminator, LineTerminator::CrLf);
    assert_eq!(lines[1].character_offset, 21);
}

#[test]
fn test_latin1_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, [b'K', 0xf6, b'l', b'n', b'\n', b'x']).unwrap();

    let config = ReaderConfig::new().with_encoding(CharacterEncoding::Iso8859_1);
    let mut lines = LineIterator::open(&path, &config).unwrap();
    assert_eq!(lines.next_line().unwrap().text, "Köln");
    let second = lines.next_line().unwrap();
    assert_eq!(second.byte_offset, Some(5));
    assert_eq!(second.character_offset, 5);

    let strict = LineIterator::open(&path, &ReaderConfig::default()).unwrap();
    let first = strict.into_iter().next().unwrap();
    assert!(matches!(first, Err(CcpError::Decode { .. })));
}
