//! Byte viewer: windowed reads and failure modes

mod common;

use bootfm_core::hexdump::{format_row, HexViewer};
use bootfm_core::path::PathRef;
use bootfm_core::storage::{MemStorage, MemVolume};
use bootfm_core::{BrowserConfig, FmError};
use common::{RecordingStorage, TestScreen};

fn storage(len: usize) -> RecordingStorage {
    let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
    RecordingStorage::new(
        MemStorage::new().with_volume("memdisk", MemVolume::new().file("/blob.bin", &data)),
    )
}

fn target() -> PathRef {
    PathRef::parse("(memdisk)/blob.bin", "memdisk").unwrap()
}

#[test]
fn test_reads_in_windows() {
    let mut storage = storage(200);
    let mut screen = TestScreen::new(1280, 1024);
    let viewer = HexViewer::new(&BrowserConfig::default().hex_window(64));

    assert_eq!(viewer.dump(&mut storage, &mut screen, &target()), Ok(200));
    assert_eq!(storage.reads, 4);

    // header + 13 rows (12 full, one of 8 bytes)
    assert_eq!(screen.lines.len(), 14);
    assert_eq!(screen.lines[0], "(memdisk)/blob.bin  200 B");
    assert!(screen.lines[5].starts_with("00000040  40 41 42"));
    assert_eq!(
        screen.lines[13],
        format_row(0xc0, &[0xc0, 0xc1, 0xc2, 0xc3, 0xc4, 0xc5, 0xc6, 0xc7], 16)
    );
    assert_eq!(storage.inner.open_handles(), 0);
}

#[test]
fn test_range_shows_only_requested_rows() {
    let mut storage = storage(200);
    let mut screen = TestScreen::new(1024, 768);
    let viewer = HexViewer::new(&BrowserConfig::default().hex_window(64));

    assert_eq!(
        viewer.dump_range(&mut storage, &mut screen, &target(), 64, 32),
        Ok(32)
    );
    assert_eq!(storage.reads, 1);
    assert_eq!(screen.lines.len(), 3);
    assert!(screen.lines[1].starts_with("00000040  40 41 42"));
    assert!(screen.lines[2].starts_with("00000050  50 51 52"));

    // clamped to the end of the file
    assert_eq!(
        viewer.dump_range(&mut storage, &mut screen, &target(), 192, 100),
        Ok(8)
    );
    assert_eq!(screen.lines.len(), 2);

    assert_eq!(
        viewer.dump_range(&mut storage, &mut screen, &target(), 500, 16),
        Ok(0)
    );
    assert_eq!(screen.lines, vec!["(memdisk)/blob.bin  200 B"]);
    assert_eq!(storage.inner.open_handles(), 0);
}

#[test]
fn test_empty_file_shows_only_header() {
    let mut storage = storage(0);
    let mut screen = TestScreen::new(1024, 768);
    let viewer = HexViewer::new(&BrowserConfig::default());

    assert_eq!(viewer.dump(&mut storage, &mut screen, &target()), Ok(0));
    assert_eq!(screen.lines, vec!["(memdisk)/blob.bin  0 B"]);
    assert_eq!(storage.reads, 0);
}

#[test]
fn test_display_gate_checks_each_dimension() {
    let viewer = HexViewer::new(&BrowserConfig::default());
    for (w, h) in [(1023, 768), (1024, 767), (640, 480)] {
        let mut storage = storage(32);
        let mut screen = TestScreen::new(w, h);
        assert_eq!(
            viewer.dump(&mut storage, &mut screen, &target()),
            Err(FmError::InsufficientDisplay)
        );
        assert_eq!(storage.io_calls(), 0);
        assert!(screen.lines.is_empty());
    }
}

#[test]
fn test_custom_minimum_resolution() {
    let viewer = HexViewer::new(&BrowserConfig::default().min_resolution(640, 480));
    let mut storage = storage(16);
    let mut screen = TestScreen::new(640, 480);
    assert_eq!(viewer.dump(&mut storage, &mut screen, &target()), Ok(16));
}

#[test]
fn test_file_shorter_than_reported_is_unreadable() {
    let mut storage = storage(300);
    storage.eof_at = Some(128);
    let mut screen = TestScreen::new(1024, 768);
    let viewer = HexViewer::new(&BrowserConfig::default().hex_window(64));

    assert_eq!(
        viewer.dump(&mut storage, &mut screen, &target()),
        Err(FmError::Unreadable)
    );
    assert_eq!(storage.inner.open_handles(), 0);
}
