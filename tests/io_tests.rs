#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;
use zxml::config::DEFAULT_MAX_SIZE;
use zxml::test_utils::{sample_catalog, tmp_file_path};
use zxml::{from_file, from_map, Config, ErrorKind, FormatConfig, XmlParser};

#[test]
fn missing_file_error() {
    let result = from_file("nonexistent_file.xml");
    let err = result.unwrap_err();
    match err.kind() {
        ErrorKind::MissingFile { path } => assert_eq!(path, "nonexistent_file.xml"),
        other => panic!("Expected MissingFile error, got {:?}", other),
    }
    assert_eq!(
        err.to_string().lines().next(),
        Some("Error: File nonexistent_file.xml does not exist")
    );
}

#[test]
fn write_then_parse_file() {
    let temp_path = tmp_file_path("catalog_roundtrip.xml");
    let element = from_map("catalog", &sample_catalog()).expect("build failed");

    fs::write(&temp_path, element.to_string_with(&FormatConfig::pretty()))
        .expect("Failed to write temp file");

    let parsed = from_file(&temp_path).expect("Failed to parse temp file");
    let _ = fs::remove_file(&temp_path);

    assert_eq!(parsed.serialize(), element.serialize());
}

#[test]
fn parse_named_temp_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "<?xml version=\"1.0\"?>\n<config><debug>true</debug></config>")
        .expect("Failed to write temp file");

    let config = from_file(file.path()).expect("Failed to parse temp file");
    assert_eq!(config.name(), "config");
    assert_eq!(
        config.child("debug").map(|d| d.text()),
        Some("true".to_string())
    );
}

#[test]
fn file_larger_than_limit() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "<data>{}</data>", "x".repeat(256)).expect("Failed to write temp file");

    let parser = XmlParser::with_config(Config::default().with_max_size(64));
    let err = parser.from_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MaxSizeExceeded { max: 64 });
}

#[test]
fn directory_is_not_a_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = from_file(dir.path()).unwrap_err();
    assert!(err.is_missing_file());
}

#[test]
fn oversized_file_is_rejected_before_reading() {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let len = u64::try_from(DEFAULT_MAX_SIZE + 1).expect("size fits in u64");
    file.as_file().set_len(len).expect("Failed to extend temp file");

    let err = from_file(file.path()).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::MaxSizeExceeded {
            max: DEFAULT_MAX_SIZE
        }
    );
}
