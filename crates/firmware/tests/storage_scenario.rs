//! Storage reader integration tests
//!
//! Runs the reader against scripted volumes and checks the exact sequence of
//! mount attempts, reads and delays.
//!
//! Run with: cargo test -p firmware --test storage_scenario

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use embassy_futures::block_on;
use firmware::tasks::{ReaderPhase, ReaderStats, StorageReader};
use platform::config::{LINE_READ_DELAY_MS, MOUNT_RETRY_MS, STORAGE_HEARTBEAT_MS};
use platform::mocks::{MockDelay, MockLed, MockVolume};
use platform::storage_local::LocalVolume;
use platform::{Led, LedId};

#[test]
fn test_two_failed_mounts_then_three_lines() {
    let volume = MockVolume::new(2, 0, &["one", "two", "three"]);
    let delay = MockDelay::new();
    let red = MockLed::new();
    let red_probe = red.probe();
    let mut reader = StorageReader::new(
        volume.clone(),
        Led::new(red, LedId::Red),
        Led::new(MockLed::new(), LedId::Green),
        delay.clone(),
    );

    let mut phases = Vec::new();
    for _ in 0..12 {
        phases.push(block_on(reader.step()));
    }

    assert_eq!(
        phases,
        [
            ReaderPhase::Mounting,  // red on, waiting
            ReaderPhase::Mounting,  // mount failure 1
            ReaderPhase::Mounting,  // mount failure 2
            ReaderPhase::Opening,   // mounted
            ReaderPhase::Reading,   // opened
            ReaderPhase::Reading,   // line 1
            ReaderPhase::Reading,   // line 2
            ReaderPhase::Reading,   // line 3
            ReaderPhase::Heartbeat, // EOF
            ReaderPhase::Heartbeat,
            ReaderPhase::Heartbeat,
            ReaderPhase::Heartbeat,
        ]
    );
    assert_eq!(
        delay.delays(),
        [
            MOUNT_RETRY_MS,
            MOUNT_RETRY_MS,
            LINE_READ_DELAY_MS,
            LINE_READ_DELAY_MS,
            LINE_READ_DELAY_MS,
            STORAGE_HEARTBEAT_MS,
            STORAGE_HEARTBEAT_MS,
            STORAGE_HEARTBEAT_MS,
        ]
    );
    assert_eq!(
        reader.stats(),
        ReaderStats {
            failed_mounts: 2,
            failed_opens: 0,
            lines_read: 3,
        }
    );

    let log = volume.log();
    assert_eq!(log.mount_attempts, 3);
    assert_eq!(log.mounts, 1);
    assert_eq!(log.open_attempts, 1);
    assert_eq!(log.lines_read, 3);
    assert_eq!(log.eof_reads, 1, "no read after end-of-file");
    assert_eq!(log.closes, 1);
    assert_eq!(log.unmounts, 1);
    assert_eq!(red_probe.toggles(), 3);
}

#[tokio::test]
async fn test_local_volume_inserted_late() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("card");
    let delay = MockDelay::new();
    let mut reader = StorageReader::new(
        LocalVolume::new(&root),
        Led::new(MockLed::new(), LedId::Red),
        Led::new(MockLed::new(), LedId::Green),
        delay.clone(),
    );

    reader.step().await;
    reader.step().await;
    assert_eq!(reader.phase(), ReaderPhase::Mounting);

    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("1STFILE.TXT"), "first\nsecond\n").unwrap();

    let mut lines = Vec::new();
    while reader.phase() != ReaderPhase::Heartbeat {
        if reader.step().await == ReaderPhase::Reading && reader.stats().lines_read as usize > lines.len() {
            lines.push(reader.last_line().to_owned());
        }
    }
    assert_eq!(lines, ["first\n", "second\n"]);
    assert_eq!(reader.stats().failed_mounts, 1);
}

#[tokio::test]
async fn test_missing_file_is_created_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut reader = StorageReader::new(
        LocalVolume::new(dir.path()),
        Led::new(MockLed::new(), LedId::Red),
        Led::new(MockLed::new(), LedId::Green),
        MockDelay::new(),
    );

    for _ in 0..4 {
        reader.step().await;
    }
    assert_eq!(reader.phase(), ReaderPhase::Heartbeat);
    assert_eq!(reader.stats().lines_read, 0);
    assert!(dir.path().join("1STFILE.TXT").exists());
}
