//! Application configuration and constants
//!
//! Central timing, capacity and asset constants used across the firmware.
//! Tasks reference these instead of hardcoding values so the hardware binary,
//! the host simulation and the tests agree on the same cadence.

use crate::storage::VolumeId;

/// The application name
pub const APP_NAME: &str = "Discovery Signals";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Signal queues ────────────────────────────────────────────────────────────

/// Slots per signal queue. Sends beyond this are dropped.
pub const QUEUE_CAPACITY: usize = 10;

// ── Button monitor ───────────────────────────────────────────────────────────

/// Poll interval while waiting for the button to be released.
pub const BUTTON_RELEASE_POLL_MS: u32 = 100;

/// Poll interval while the button is idle.
///
/// Tasks sharing the thread-mode executor only run when this task awaits.
pub const BUTTON_IDLE_POLL_MS: u32 = 10;

// ── LED controller ───────────────────────────────────────────────────────────

/// LED controller tick period.
pub const LED_TICK_MS: u32 = 500;

// ── Audio controller ─────────────────────────────────────────────────────────

/// Audio controller tick period.
pub const AUDIO_TICK_MS: u32 = 200;

/// Output sample rate handed to the playback engine.
pub const AUDIO_SAMPLE_RATE_HZ: u32 = 48_000;

/// Size in bytes of the audio table stored in flash, header included.
pub const AUDIO_FILE_SIZE: usize = 990_000;

/// Length of the RIFF/WAVE header at the start of the audio table.
///
/// Playback starts at this offset.
pub const AUDIO_START_OFFSET: usize = 58;

// ── Storage reader ───────────────────────────────────────────────────────────

/// Delay between failed mount attempts.
pub const MOUNT_RETRY_MS: u32 = 1_000;

/// Delay between failed open attempts.
pub const OPEN_RETRY_MS: u32 = 500;

/// Delay after each line read.
pub const LINE_READ_DELAY_MS: u32 = 1_000;

/// Heartbeat toggle period once the file has been consumed.
pub const STORAGE_HEARTBEAT_MS: u32 = 300;

/// Volume holding the text file.
pub const STORAGE_VOLUME: VolumeId = VolumeId(0);

/// Path of the text file echoed by the storage reader (8.3 name in the root
/// directory).
pub const STORAGE_FILE_PATH: &str = "1STFILE.TXT";

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn audio_offset_lies_inside_the_table() {
        assert!(AUDIO_START_OFFSET < AUDIO_FILE_SIZE);
    }

    #[test]
    fn release_poll_is_slower_than_idle_poll() {
        assert!(BUTTON_IDLE_POLL_MS < BUTTON_RELEASE_POLL_MS);
    }

    #[test]
    fn version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
