//! SD card [`Volume`] over SPI using `embedded-sdmmc`.
//!
//! # Wiring (Discovery board + SPI microSD breakout)
//!
//! | Signal | MCU pin | Notes                   |
//! |--------|---------|-------------------------|
//! | SCK    | PA5     | SPI1, 400 kHz           |
//! | MISO   | PA6     | SPI1                    |
//! | MOSI   | PA7     | SPI1                    |
//! | CS     | PB5     | GPIO output, active low |
//!
//! `embedded-sdmmc` is blocking; every operation here completes before the
//! returned future is first polled to completion. Card initialisation happens
//! lazily on the first volume access, so a missing card shows up as a mount
//! failure and a later mount retries the handshake.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{
    Mode, RawDirectory, RawFile, RawVolume, SdCard, SdCardError, TimeSource, Timestamp,
    VolumeIdx, VolumeManager,
};
use platform::storage::take_line;
use platform::{Line, LineRead, StorageError, Volume, VolumeId, LINE_CAPACITY};
use thiserror_no_std::Error;

/// Bytes fetched from the card per read call.
const READ_CHUNK: usize = 64;

/// Errors from [`SdCardVolume`].
#[derive(Debug, Error)]
pub enum SdCardVolumeError {
    /// Volume-level condition.
    #[error("{0}")]
    Storage(StorageError),
    /// Error reported by the card or the FAT layer.
    #[error("FAT driver error")]
    Fat(embedded_sdmmc::Error<SdCardError>),
}

impl From<embedded_sdmmc::Error<SdCardError>> for SdCardVolumeError {
    fn from(e: embedded_sdmmc::Error<SdCardError>) -> Self {
        Self::Fat(e)
    }
}

/// Fixed timestamp for created files; the board has no battery-backed RTC.
pub struct FixedTime;

impl TimeSource for FixedTime {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 54, // 2024
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// An open file plus its read-ahead buffer.
pub struct SdFile {
    raw: RawFile,
    buf: [u8; READ_CHUNK],
    pos: usize,
    len: usize,
    /// Bytes moved out of `buf` but not yet returned as a line.
    pending: heapless::Vec<u8, LINE_CAPACITY>,
}

impl SdFile {
    fn buffered(&self) -> &[u8] {
        self.buf.get(self.pos..self.len).unwrap_or_default()
    }
}

struct Mounted {
    volume: RawVolume,
    root: RawDirectory,
}

/// FAT volume on an SPI-mode SD card.
pub struct SdCardVolume<S: SpiDevice<u8>, D: DelayNs> {
    mgr: VolumeManager<SdCard<S, D>, FixedTime>,
    mounted: Option<Mounted>,
}

impl<S: SpiDevice<u8>, D: DelayNs> SdCardVolume<S, D> {
    /// Wrap an SPI device with the card's chip select.
    pub fn new(spi: S, delay: D) -> Self {
        Self {
            mgr: VolumeManager::new(SdCard::new(spi, delay), FixedTime),
            mounted: None,
        }
    }

    fn read_chunk(&mut self, file: &mut SdFile) -> Result<usize, SdCardVolumeError> {
        let n = match self.mgr.read(file.raw, &mut file.buf) {
            Ok(n) => n,
            Err(embedded_sdmmc::Error::EndOfFile) => 0,
            Err(e) => return Err(e.into()),
        };
        file.pos = 0;
        file.len = n;
        Ok(n)
    }
}

impl<S: SpiDevice<u8>, D: DelayNs> Volume for SdCardVolume<S, D> {
    type Error = SdCardVolumeError;
    type File = SdFile;

    async fn mount(&mut self, id: VolumeId) -> Result<(), Self::Error> {
        if self.mounted.is_some() {
            return Ok(());
        }
        let volume = self.mgr.open_raw_volume(VolumeIdx(usize::from(id.0)))?;
        let root = match self.mgr.open_root_dir(volume) {
            Ok(root) => root,
            Err(e) => {
                let _ = self.mgr.close_volume(volume);
                return Err(e.into());
            }
        };
        self.mounted = Some(Mounted { volume, root });
        Ok(())
    }

    async fn open(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let root = self
            .mounted
            .as_ref()
            .map(|m| m.root)
            .ok_or(SdCardVolumeError::Storage(StorageError::NotMounted))?;
        let raw = self
            .mgr
            .open_file_in_dir(root, path, Mode::ReadWriteCreateOrAppend)?;
        // Append mode leaves the cursor at the end; lines are read from the start.
        if let Err(e) = self.mgr.file_seek_from_start(raw, 0) {
            let _ = self.mgr.close_file(raw);
            return Err(e.into());
        }
        Ok(SdFile {
            raw,
            buf: [0; READ_CHUNK],
            pos: 0,
            len: 0,
            pending: heapless::Vec::new(),
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
            if file.buffered().is_empty() && self.read_chunk(file)? == 0 {
                at_eof = true;
                break;
            }
            let Some(&byte) = file.buffered().first() else {
                at_eof = true;
                break;
            };
            if file.pending.push(byte).is_err() {
                break;
            }
            file.pos = file.pos.saturating_add(1);
        }

        if file.pending.is_empty() {
            return Ok(LineRead::EndOfFile);
        }
        // A character cut at the limit stays in `pending` for the next call.
        let used = take_line(line, &file.pending, at_eof).min(file.pending.len());
        file.pending.rotate_left(used);
        file.pending.truncate(file.pending.len().saturating_sub(used));
        Ok(LineRead::Line)
    }

    async fn close(&mut self, file: Self::File) -> Result<(), Self::Error> {
        self.mgr.close_file(file.raw)?;
        Ok(())
    }

    async fn unmount(&mut self, _id: VolumeId) -> Result<(), Self::Error> {
        let Some(mounted) = self.mounted.take() else {
            return Ok(());
        };
        self.mgr.close_dir(mounted.root)?;
        self.mgr.close_volume(mounted.volume)?;
        Ok(())
    }
}
