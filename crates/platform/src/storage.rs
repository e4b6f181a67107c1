//! Storage volume abstraction
//!
//! Mirrors the small subset of a FAT driver the storage reader needs:
//! mount a volume, open one file, pull it line by line, close and unmount.
//! The file system itself is an external service.

use thiserror_no_std::Error;

/// Maximum line length including the terminating newline.
pub const LINE_CAPACITY: usize = 100;

/// One line of text as returned by [`Volume::read_line`].
pub type Line = heapless::String<LINE_CAPACITY>;

/// Logical drive number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeId(pub u8);

/// Outcome of a single [`Volume::read_line`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineRead {
    /// A line (or the first `LINE_CAPACITY - 1` bytes of a longer one) was
    /// stored in the buffer.
    Line,
    /// Nothing left to read.
    EndOfFile,
}

/// Common failure vocabulary for [`Volume`] implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No medium present or it did not answer.
    #[error("no medium present")]
    NoMedia,
    /// An operation needed a mounted volume.
    #[error("volume not mounted")]
    NotMounted,
    /// The requested file does not exist and could not be created.
    #[error("file not found")]
    NotFound,
    /// Low-level read/write failure.
    #[error("I/O error")]
    Io,
}

impl StorageError {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMedia => "no media",
            Self::NotMounted => "not mounted",
            Self::NotFound => "not found",
            Self::Io => "I/O error",
        }
    }
}

/// A mountable volume holding text files
pub trait Volume {
    /// Error type
    type Error: core::fmt::Debug;
    /// Open-file handle
    type File;

    /// Mount volume `id`.
    fn mount(&mut self, id: VolumeId)
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Open `path` for reading and writing, creating it if missing.
    /// The read position starts at the beginning of the file.
    fn open(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// Read the next line into `line`, newline included when it fits.
    ///
    /// `line` is cleared first. At most `LINE_CAPACITY - 1` bytes are stored;
    /// the remainder of a longer line is returned by the following calls.
    fn read_line(
        &mut self,
        file: &mut Self::File,
        line: &mut Line,
    ) -> impl core::future::Future<Output = Result<LineRead, Self::Error>>;

    /// Close `file`.
    fn close(&mut self, file: Self::File)
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Unmount volume `id`.
    fn unmount(&mut self, id: VolumeId)
        -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Append `bytes` to `line`, replacing invalid UTF-8 and stopping once the
/// line is full. Returns the number of input bytes consumed.
pub fn push_lossy(line: &mut Line, bytes: &[u8]) -> usize {
    let mut consumed = 0usize;
    for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            if line.push(ch).is_err() {
                return consumed;
            }
            consumed = consumed.saturating_add(ch.len_utf8());
        }
        if !chunk.invalid().is_empty() {
            if line.push(char::REPLACEMENT_CHARACTER).is_err() {
                return consumed;
            }
            consumed = consumed.saturating_add(chunk.invalid().len());
        }
    }
    consumed
}

/// Length of the longest prefix of `bytes` that does not end inside a
/// multibyte UTF-8 sequence.
///
/// Only the last lead byte is inspected; malformed input counts as complete
/// and is left to [`push_lossy`].
pub fn complete_prefix_len(bytes: &[u8]) -> usize {
    let Some(back) = bytes.iter().rev().take(4).position(|b| b & 0xC0 != 0x80) else {
        return bytes.len();
    };
    let lead_at = bytes.len().saturating_sub(back).saturating_sub(1);
    let needed = match bytes.get(lead_at) {
        Some(0xC0..=0xDF) => 2,
        Some(0xE0..=0xEF) => 3,
        Some(0xF0..=0xF7) => 4,
        _ => 1,
    };
    if back.saturating_add(1) < needed {
        lead_at
    } else {
        bytes.len()
    }
}

/// Move the next line piece from `pending` into `line` and return how many
/// bytes of `pending` it used.
///
/// `pending` holds bytes fetched from the file but not yet delivered. The
/// piece ends after the first newline within `LINE_CAPACITY - 1` bytes.
/// Without a newline, a piece that may continue in bytes not yet fetched
/// (`at_eof` false, or more than a piece pending) stops at the last complete
/// UTF-8 character. Bytes that do not fit stay in `pending` for the next call.
pub fn take_line(line: &mut Line, pending: &[u8], at_eof: bool) -> usize {
    line.clear();
    let limit = LINE_CAPACITY.saturating_sub(1);
    let window = pending.get(..limit).unwrap_or(pending);
    let piece = match window.iter().position(|&b| b == b'\n') {
        Some(newline) => window.get(..=newline).unwrap_or(window),
        None if !at_eof || pending.len() > window.len() => {
            window.get(..complete_prefix_len(window)).unwrap_or(window)
        }
        None => window,
    };
    push_lossy(line, piece)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Feed `text` through `take_line` the way a volume does: top up the
    /// pending bytes in `chunk`-sized reads, deliver, repeat.
    fn split(text: &[u8], chunk: usize) -> Vec<String> {
        let limit = LINE_CAPACITY - 1;
        let mut source = text;
        let mut pending: Vec<u8> = Vec::new();
        let mut line = Line::new();
        let mut lines = Vec::new();
        loop {
            let mut at_eof = false;
            while pending.len() < limit && !pending.contains(&b'\n') {
                if source.is_empty() {
                    at_eof = true;
                    break;
                }
                let n = chunk.min(source.len()).min(limit - pending.len());
                pending.extend_from_slice(&source[..n]);
                source = &source[n..];
            }
            if pending.is_empty() {
                return lines;
            }
            let used = take_line(&mut line, &pending, at_eof);
            assert!(used > 0, "no progress");
            pending.drain(..used);
            lines.push(line.as_str().to_owned());
        }
    }

    #[test]
    fn complete_prefix_len_backs_off_split_character() {
        assert_eq!(complete_prefix_len(b"ab"), 2);
        assert_eq!(complete_prefix_len("aé".as_bytes()), 3);
        assert_eq!(complete_prefix_len(&"aé".as_bytes()[..2]), 1);
        assert_eq!(complete_prefix_len(&"a€".as_bytes()[..3]), 1);
        assert_eq!(complete_prefix_len(&"a😀".as_bytes()[..4]), 1);
        assert_eq!(complete_prefix_len(&[0x80, 0x80]), 2);
    }

    #[test]
    fn two_byte_character_straddling_the_limit_is_kept_whole() {
        let text = format!("{}é\n", "a".repeat(98));
        let lines = split(text.as_bytes(), 4096);
        assert_eq!(lines, ["a".repeat(98), "é\n".to_owned()]);
    }

    #[test]
    fn replacement_characters_never_overflow_the_line() {
        let text = [0xFFu8; 150];
        let lines = split(&text, 64);
        assert!(lines.iter().all(|l| l.len() <= LINE_CAPACITY));
        let replaced: usize = lines.iter().map(|l| l.chars().count()).sum();
        assert_eq!(replaced, 150);
    }

    proptest! {
        /// Valid text comes back byte for byte, in pieces of at most
        /// `LINE_CAPACITY - 1` bytes, whatever the read size.
        #[test]
        fn prop_valid_text_is_delivered_exactly(text in "(\\PC{0,140}\n){0,4}\\PC{0,140}", chunk in 1usize..200) {
            let lines = split(text.as_bytes(), chunk);
            prop_assert_eq!(lines.concat(), text);
            for l in &lines {
                prop_assert!(l.len() < LINE_CAPACITY);
            }
        }
    }

    #[test]
    fn push_lossy_copies_ascii() {
        let mut line = Line::new();
        assert_eq!(push_lossy(&mut line, b"hello\n"), 6);
        assert_eq!(line.as_str(), "hello\n");
    }

    #[test]
    fn push_lossy_replaces_invalid_bytes() {
        let mut line = Line::new();
        push_lossy(&mut line, &[b'a', 0xFF, b'b']);
        assert_eq!(line.as_str(), "a\u{FFFD}b");
    }

    #[test]
    fn push_lossy_stops_at_capacity() {
        let mut line = Line::new();
        let long = [b'x'; LINE_CAPACITY + 20];
        let consumed = push_lossy(&mut line, &long);
        assert_eq!(consumed, LINE_CAPACITY);
        assert_eq!(line.len(), LINE_CAPACITY);
    }

    #[test]
    fn storage_error_messages() {
        assert_eq!(StorageError::NoMedia.as_str(), "no media");
        assert_eq!(format!("{}", StorageError::NotMounted), "volume not mounted");
    }
}
