//! # Loader Tests
//!
//! Shape guarantees of the hex file loader: exact, short, long and missing
//! files, unknown states, and record writing.

use std::fs;

use imgdiv_core::HexByteOrder;
use imgdiv_core::sim::loader::{self, LoadOrigin, LoadStats};
use ndarray::array;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use imgdiv_core::common::VerifyError;

use crate::common::{capture_logs, init_tracing, write_lines};

const ORDER: HexByteOrder = HexByteOrder::MsbFirst;

#[test]
fn test_exact_file_is_row_major() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = write_lines(
        dir.path(),
        "exact.txt",
        &["3f800000", "40000000", "40400000", "40800000", "40a00000", "40c00000"],
    );

    let image = loader::load_hex_image(&path, (2, 3), ORDER).unwrap();
    assert_eq!(image.origin, LoadOrigin::File);
    assert_eq!(image.data, array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(
        image.stats,
        LoadStats {
            records: 6,
            ..LoadStats::default()
        }
    );
    assert!(!image.stats.is_degraded());
}

#[test]
fn test_short_file_is_zero_padded() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "short.txt", &["3f800000", "40000000", "40400000"]);

    let image = loader::load_hex_image(&path, (2, 3), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 2.0, 3.0], [0.0, 0.0, 0.0]]);
    assert_eq!(image.stats.padded, 3);
    assert!(image.stats.is_degraded());
}

#[test]
fn test_short_file_warns_once() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "short.txt", &["3f800000"]);

    let (image, logs) = capture_logs(|| loader::load_hex_image(&path, (4, 4), ORDER).unwrap());
    assert_eq!(image.stats.padded, 15);
    assert_eq!(logs.matches("not enough records").count(), 1);
    assert!(logs.contains("WARN"));
}

#[test]
fn test_exact_file_does_not_warn() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "exact.txt", &["3f800000", "40000000"]);

    let (_, logs) = capture_logs(|| loader::load_hex_image(&path, (1, 2), ORDER).unwrap());
    assert!(!logs.contains("WARN"));
}

#[test]
fn test_long_file_is_truncated() {
    let dir = tempdir().unwrap();
    let path = write_lines(
        dir.path(),
        "long.txt",
        &["3f800000", "40000000", "40400000", "40800000", "40a00000"],
    );

    let image = loader::load_hex_image(&path, (2, 2), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 2.0], [3.0, 4.0]]);
    assert_eq!(image.stats.truncated, 1);
    assert!(!image.stats.is_degraded());
}

#[test]
fn test_unknown_state_record_is_zero() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "x.txt", &["3f800000", "xxxxxxxx", "zzzz0000", "40800000"]);

    let image = loader::load_hex_image(&path, (2, 2), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 0.0], [0.0, 4.0]]);
    assert_eq!(image.stats.unknown, 2);
    assert_eq!(image.stats.malformed, 0);
}

#[test]
fn test_malformed_and_blank_records_are_zero() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "bad.txt", &["3f800000", "", "nothex!!", "40800000"]);

    let image = loader::load_hex_image(&path, (1, 4), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 0.0, 0.0, 4.0]]);
    assert_eq!(image.stats.malformed, 2);
    assert_eq!(image.stats.records, 4);
}

#[test]
fn test_crlf_line_endings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crlf.txt");
    fs::write(&path, "3f800000\r\n40000000\r\n").unwrap();

    let image = loader::load_hex_image(&path, (1, 2), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 2.0]]);
    assert_eq!(image.stats.malformed, 0);
}

#[test]
fn test_invalid_utf8_only_spoils_its_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binary.txt");
    fs::write(&path, b"3f800000\n3f\xff00000\n40000000\n").unwrap();

    let image = loader::load_hex_image(&path, (1, 3), ORDER).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 0.0, 2.0]]);
    assert_eq!(image.stats.malformed, 1);
}

#[test]
fn test_missing_file_is_zero_frame() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let image = loader::load_hex_image(&path, (3, 4), ORDER).unwrap();
    assert_eq!(image.origin, LoadOrigin::Missing);
    assert_eq!(image.data.dim(), (3, 4));
    assert!(image.data.iter().all(|&v| v == 0.0));
    assert_eq!(image.stats.padded, 12);
}

#[test]
fn test_oversized_shape_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let shape = (1 << 33, 1 << 33);

    let err = loader::load_hex_image(&path, shape, ORDER).unwrap_err();
    assert!(matches!(err, VerifyError::FrameTooLarge { .. }));
    assert!(matches!(
        loader::HexImage::missing(shape),
        Err(VerifyError::FrameTooLarge { .. })
    ));
}

#[test]
fn test_directory_path_is_read_error() {
    let dir = tempdir().unwrap();
    let result = loader::load_hex_image(dir.path(), (1, 1), ORDER);
    assert!(result.is_err());
}

#[test]
fn test_lsb_first_file() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "lsb.txt", &["0000803f", "00000040"]);

    let image = loader::load_hex_image(&path, (1, 2), HexByteOrder::LsbFirst).unwrap();
    assert_eq!(image.data, array![[1.0_f32, 2.0]]);
}

#[test]
fn test_write_records_newline_terminated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let count = loader::write_hex_records(&path, [1.0_f32, 0.5, -2.0], ORDER).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "3f800000\n3f000000\nc0000000\n"
    );
}

#[test]
fn test_write_records_overwrites() {
    let dir = tempdir().unwrap();
    let path = write_lines(dir.path(), "out.txt", &["deadbeef", "deadbeef", "deadbeef"]);

    let count = loader::write_hex_records(&path, [0.0_f32], ORDER).unwrap();
    assert_eq!(count, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "00000000\n");
}

#[test]
fn test_written_records_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("frame.txt");
    let values = [0.25_f32, 0.003_921_569, 1.0, 1.001];

    let _ = loader::write_hex_records(&path, values, HexByteOrder::LsbFirst).unwrap();
    let image = loader::load_hex_image(&path, (2, 2), HexByteOrder::LsbFirst).unwrap();
    let loaded: Vec<u32> = image.data.iter().map(|v| v.to_bits()).collect();
    let expected: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
    assert_eq!(loaded, expected);
}

#[test]
fn test_decode_records_counts() {
    let (values, stats) = loader::decode_records("3f800000\nxxxxxxxx\n12\n", ORDER);
    assert_eq!(values, vec![1.0, 0.0, 0.0]);
    assert_eq!(stats.records, 3);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.malformed, 1);
}
