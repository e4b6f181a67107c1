//! Storage reader: echo a text file from the SD card, then idle.
//!
//! The reader is a one-shot sequence driven one phase transition at a time:
//!
//! ```text
//! Start ─▶ Mounting ──(ok)──▶ Opening ──(ok)──▶ Reading ──(EOF)──▶ Heartbeat
//!            │  ▲               │  ▲               │  ▲                │  ▲
//!            └──┘ 1000 ms       └──┘ 500 ms        └──┘ 1000 ms        └──┘ 300 ms
//! ```
//!
//! Mount and open are retried forever. Once the file has been read the
//! reader closes it, unmounts the volume and blinks the red LED for the rest
//! of its life.

use embedded_hal::digital::StatefulOutputPin;
use embedded_hal_async::delay::DelayNs;
use platform::config::{
    LINE_READ_DELAY_MS, MOUNT_RETRY_MS, OPEN_RETRY_MS, STORAGE_FILE_PATH, STORAGE_HEARTBEAT_MS,
    STORAGE_VOLUME,
};
use platform::{Led, Line, LineRead, Volume, VolumeId};

/// Where the reader is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReaderPhase {
    /// Nothing done yet.
    Start,
    /// Waiting for the volume to mount.
    Mounting,
    /// Volume mounted, waiting for the file to open.
    Opening,
    /// File open, echoing lines.
    Reading,
    /// Terminal: file consumed, LED heartbeat only.
    Heartbeat,
}

impl ReaderPhase {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Mounting => "mounting",
            Self::Opening => "opening",
            Self::Reading => "reading",
            Self::Heartbeat => "heartbeat",
        }
    }
}

/// Counters kept by the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Mount attempts that failed.
    pub failed_mounts: u32,
    /// Open attempts that failed.
    pub failed_opens: u32,
    /// Lines echoed.
    pub lines_read: u32,
}

/// Storage reader task state.
pub struct StorageReader<V: Volume, P, D> {
    volume: V,
    volume_id: VolumeId,
    path: &'static str,
    red: Led<P>,
    green: Led<P>,
    delay: D,
    phase: ReaderPhase,
    stats: ReaderStats,
    file: Option<V::File>,
    line: Line,
}

impl<V: Volume, P: StatefulOutputPin, D: DelayNs> StorageReader<V, P, D> {
    /// Reader for `1STFILE.TXT` on volume 0, using `red` as the wait and
    /// heartbeat indicator and `green` as the progress indicator.
    pub fn new(volume: V, red: Led<P>, green: Led<P>, delay: D) -> Self {
        Self {
            volume,
            volume_id: STORAGE_VOLUME,
            path: STORAGE_FILE_PATH,
            red,
            green,
            delay,
            phase: ReaderPhase::Start,
            stats: ReaderStats::default(),
            file: None,
            line: Line::new(),
        }
    }

    /// Read `path` instead of the default file.
    #[must_use]
    pub fn with_path(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> ReaderPhase {
        self.phase
    }

    /// Counters so far.
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Most recently read line.
    pub fn last_line(&self) -> &str {
        self.line.as_str()
    }

    /// Perform one step of the sequence (including its delay, if any) and
    /// return the phase reached.
    pub async fn step(&mut self) -> ReaderPhase {
        match self.phase {
            ReaderPhase::Start => {
                self.red.on();
                platform::log_info!("waiting for storage volume");
                self.phase = ReaderPhase::Mounting;
            }
            ReaderPhase::Mounting => self.try_mount().await,
            ReaderPhase::Opening => self.try_open().await,
            ReaderPhase::Reading => self.read_next().await,
            ReaderPhase::Heartbeat => {
                self.red.toggle();
                self.delay.delay_ms(STORAGE_HEARTBEAT_MS).await;
            }
        }
        self.phase
    }

    async fn try_mount(&mut self) {
        match self.volume.mount(self.volume_id).await {
            Ok(()) => {
                platform::log_info!("opening file");
                self.phase = ReaderPhase::Opening;
            }
            Err(_) => {
                self.stats.failed_mounts = self.stats.failed_mounts.saturating_add(1);
                platform::log_debug!("mount failed, retry {}", self.stats.failed_mounts);
                self.delay.delay_ms(MOUNT_RETRY_MS).await;
            }
        }
    }

    async fn try_open(&mut self) {
        match self.volume.open(self.path).await {
            Ok(file) => {
                self.file = Some(file);
                self.red.off();
                self.green.on();
                platform::log_info!("reading");
                self.phase = ReaderPhase::Reading;
            }
            Err(_) => {
                self.stats.failed_opens = self.stats.failed_opens.saturating_add(1);
                platform::log_debug!("open {} failed, retry {}", self.path, self.stats.failed_opens);
                self.delay.delay_ms(OPEN_RETRY_MS).await;
                self.red.toggle();
            }
        }
    }

    async fn read_next(&mut self) {
        let Some(file) = self.file.as_mut() else {
            self.finish().await;
            return;
        };
        match self.volume.read_line(file, &mut self.line).await {
            Ok(LineRead::Line) => {
                platform::log_info!("{}", self.line.as_str());
                self.green.toggle();
                self.stats.lines_read = self.stats.lines_read.saturating_add(1);
                self.delay.delay_ms(LINE_READ_DELAY_MS).await;
            }
            Ok(LineRead::EndOfFile) => {
                platform::log_info!("EOF");
                self.finish().await;
            }
            Err(_) => {
                platform::log_warn!("read failed, treating as EOF");
                self.finish().await;
            }
        }
    }

    async fn finish(&mut self) {
        if let Some(file) = self.file.take() {
            if self.volume.close(file).await.is_err() {
                platform::log_warn!("close failed");
            }
        }
        if self.volume.unmount(self.volume_id).await.is_err() {
            platform::log_warn!("unmount failed");
        }
        self.green.off();
        self.phase = ReaderPhase::Heartbeat;
        platform::log_debug!(
            "storage reader done: {} lines, {} failed mounts, {} failed opens",
            self.stats.lines_read,
            self.stats.failed_mounts,
            self.stats.failed_opens
        );
    }

    /// Run forever.
    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
