//! Local filesystem Volume implementation for the desktop emulator.
//!
//! `LocalVolume` implements `platform::Volume` using `std::fs`.
//! Used when the `std` feature is enabled (emulator builds and tests only).
//! The volume counts as "inserted" while its root directory exists, which lets
//! the host simulation exercise the mount retry loop by creating the
//! directory late.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::storage::{take_line, Line, LineRead, StorageError, Volume, VolumeId, LINE_CAPACITY};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub enum LocalVolumeError {
    /// Volume-level condition (no medium, not mounted).
    Storage(StorageError),
    /// Error reported by the host filesystem.
    Io(std::io::Error),
}

impl core::fmt::Display for LocalVolumeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "local volume: {e}"),
            Self::Io(e) => write!(f, "local volume I/O error: {e}"),
        }
    }
}

impl std::error::Error for LocalVolumeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LocalVolumeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    reader: BufReader<fs::File>,
    /// Bytes taken from `reader` but not yet returned as a line.
    pending: Vec<u8>,
}

/// A `platform::Volume` implementation backed by `std::fs`.
///
/// Paths passed to [`LocalVolume::open`] are resolved relative to the root
/// directory given at construction.
///
/// # Example
/// ```ignore
/// # async fn example() {
/// use platform::storage_local::LocalVolume;
/// use platform::{Volume, VolumeId};
/// let mut volume = LocalVolume::new("/tmp/sdcard");
/// volume.mount(VolumeId(0)).await.unwrap();
/// let file = volume.open("1STFILE.TXT").await.unwrap();
/// # }
/// ```
pub struct LocalVolume {
    root: PathBuf,
    mounted: bool,
}

impl LocalVolume {
    /// Create a volume rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: false,
        }
    }

    /// Create from the `STORAGE_ROOT` environment variable.
    ///
    /// Returns `None` if `STORAGE_ROOT` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("STORAGE_ROOT").ok().map(Self::new)
    }

    /// Whether [`Volume::mount`] has succeeded and no unmount followed.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl Volume for LocalVolume {
    type Error = LocalVolumeError;
    type File = LocalFile;

    async fn mount(&mut self, _id: VolumeId) -> Result<(), Self::Error> {
        if !self.root.is_dir() {
            return Err(LocalVolumeError::Storage(StorageError::NoMedia));
        }
        self.mounted = true;
        Ok(())
    }

    async fn open(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        if !self.mounted {
            return Err(LocalVolumeError::Storage(StorageError::NotMounted));
        }
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.root.join(path))?;
        Ok(LocalFile {
            reader: BufReader::new(file),
            pending: Vec::with_capacity(LINE_CAPACITY),
        })
    }

    async fn read_line(
        &mut self,
        file: &mut Self::File,
        line: &mut Line,
    ) -> Result<LineRead, Self::Error> {
        line.clear();
        let limit = LINE_CAPACITY.saturating_sub(1);
        let mut at_eof = false;
        while file.pending.len() < limit && !file.pending.contains(&b'\n') {
            let buf = file.reader.fill_buf()?;
            if buf.is_empty() {
                at_eof = true;
                break;
            }
            let room = limit.saturating_sub(file.pending.len());
            let take = buf
                .iter()
                .take(room)
                .position(|&b| b == b'\n')
                .map_or(buf.len().min(room), |newline| newline.saturating_add(1));
            file.pending.extend_from_slice(buf.get(..take).unwrap_or_default());
            file.reader.consume(take);
        }
        if file.pending.is_empty() {
            return Ok(LineRead::EndOfFile);
        }
        let used = take_line(line, &file.pending, at_eof);
        file.pending.drain(..used);
        Ok(LineRead::Line)
    }

    async fn close(&mut self, file: Self::File) -> Result<(), Self::Error> {
        drop(file);
        Ok(())
    }

    async fn unmount(&mut self, _id: VolumeId) -> Result<(), Self::Error> {
        self.mounted = false;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ID: VolumeId = VolumeId(0);

    #[tokio::test]
    async fn mount_fails_without_root_directory() {
        let tmp = TempDir::new().unwrap();
        let mut volume = LocalVolume::new(tmp.path().join("not-inserted"));
        let err = volume.mount(ID).await.unwrap_err();
        assert!(matches!(err, LocalVolumeError::Storage(StorageError::NoMedia)));
        assert!(!volume.is_mounted());
    }

    #[tokio::test]
    async fn open_requires_mount() {
        let tmp = TempDir::new().unwrap();
        let mut volume = LocalVolume::new(tmp.path());
        assert!(matches!(
            volume.open("1STFILE.TXT").await,
            Err(LocalVolumeError::Storage(StorageError::NotMounted))
        ));
    }

    #[tokio::test]
    async fn open_creates_missing_file_empty() {
        let tmp = TempDir::new().unwrap();
        let mut volume = LocalVolume::new(tmp.path());
        volume.mount(ID).await.unwrap();
        let mut file = volume.open("NEW.TXT").await.unwrap();
        let mut line = Line::new();
        assert_eq!(
            volume.read_line(&mut file, &mut line).await.unwrap(),
            LineRead::EndOfFile
        );
        assert!(tmp.path().join("NEW.TXT").exists());
    }

    #[tokio::test]
    async fn reads_lines_until_eof() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("1STFILE.TXT"), "one\ntwo\nthree").unwrap();
        let mut volume = LocalVolume::new(tmp.path());
        volume.mount(ID).await.unwrap();
        let mut file = volume.open("1STFILE.TXT").await.unwrap();
        let mut line = Line::new();

        let mut lines = Vec::new();
        while volume.read_line(&mut file, &mut line).await.unwrap() == LineRead::Line {
            lines.push(line.as_str().to_owned());
        }
        assert_eq!(lines, ["one\n", "two\n", "three"]);

        volume.close(file).await.unwrap();
        volume.unmount(ID).await.unwrap();
        assert!(!volume.is_mounted());
    }

    #[tokio::test]
    async fn long_line_is_split_at_capacity() {
        let tmp = TempDir::new().unwrap();
        let long = "y".repeat(150);
        fs::write(tmp.path().join("LONG.TXT"), format!("{long}\n")).unwrap();
        let mut volume = LocalVolume::new(tmp.path());
        volume.mount(ID).await.unwrap();
        let mut file = volume.open("LONG.TXT").await.unwrap();
        let mut line = Line::new();

        volume.read_line(&mut file, &mut line).await.unwrap();
        assert_eq!(line.len(), LINE_CAPACITY - 1);
        volume.read_line(&mut file, &mut line).await.unwrap();
        assert_eq!(line.len(), 150 - (LINE_CAPACITY - 1) + 1);
        assert!(line.ends_with('\n'));
    }

    #[tokio::test]
    async fn multibyte_character_at_the_cut_survives() {
        let tmp = TempDir::new().unwrap();
        let text = format!("{}é\nnext é line\n", "a".repeat(98));
        fs::write(tmp.path().join("UTF8.TXT"), &text).unwrap();
        let mut volume = LocalVolume::new(tmp.path());
        volume.mount(ID).await.unwrap();
        let mut file = volume.open("UTF8.TXT").await.unwrap();
        let mut line = Line::new();

        let mut out = String::new();
        let mut pieces = 0;
        while volume.read_line(&mut file, &mut line).await.unwrap() == LineRead::Line {
            out.push_str(&line);
            pieces += 1;
        }
        assert_eq!(out, text);
        assert_eq!(pieces, 3);
    }
}
