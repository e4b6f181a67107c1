//! The audio table linked into flash.
//!
//! `build.rs` generates `audio_sample.bin` in `OUT_DIR`: a RIFF/WAVE header
//! padded to [`AUDIO_START_OFFSET`] bytes followed by a 16-bit stereo
//! 48 kHz tone, [`AUDIO_FILE_SIZE`] bytes in total.

use platform::config::{AUDIO_FILE_SIZE, AUDIO_START_OFFSET};
use playback::{AudioPayload, PayloadError};

/// Raw table, header included.
pub static AUDIO_SAMPLE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/audio_sample.bin"));

/// The table described with its size and header length.
pub fn payload() -> Result<AudioPayload, PayloadError> {
    AudioPayload::new(AUDIO_SAMPLE, AUDIO_FILE_SIZE, AUDIO_START_OFFSET)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_declared_size() {
        assert_eq!(AUDIO_SAMPLE.len(), AUDIO_FILE_SIZE);
    }

    #[test]
    fn test_header_is_riff_wave() {
        let header = payload().unwrap().header();
        assert_eq!(header.get(0..4), Some(&b"RIFF"[..]));
        assert_eq!(header.get(8..12), Some(&b"WAVE"[..]));
        assert_eq!(header.len(), AUDIO_START_OFFSET);
    }

    #[test]
    fn test_samples_exclude_header() {
        let payload = payload().unwrap();
        assert_eq!(payload.samples().len(), AUDIO_FILE_SIZE - AUDIO_START_OFFSET);
        assert!(payload.samples().iter().any(|b| *b != 0), "tone must not be silent");
    }
}
