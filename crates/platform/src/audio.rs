//! Playback engine abstraction
//!
//! The codec, I2S and DMA plumbing behind this trait is an opaque service:
//! the audio controller only starts playback once and then issues
//! pause/resume (or stop) commands. Every call returns immediately and cannot
//! fail from the caller's point of view.

/// Pause/resume command for [`AudioPlayer::pause_resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PauseResume {
    /// Suspend output, keeping the playback position.
    Pause,
    /// Continue output from the kept position.
    Resume,
}

impl PauseResume {
    /// Flag value understood by the vendor wave player (0 = pause, 1 = resume).
    pub const fn flag(self) -> u8 {
        match self {
            Self::Pause => 0,
            Self::Resume => 1,
        }
    }

    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
        }
    }
}

/// Audio playback engine
pub trait AudioPlayer {
    /// Bring up the output path at `sample_rate_hz`.
    fn initialize(&mut self, sample_rate_hz: u32);

    /// Start streaming `samples`.
    ///
    /// `samples` already excludes the file header; `total_len` is the size of
    /// the whole table including the header and `offset` the header length.
    fn play(&mut self, samples: &'static [u8], total_len: usize, offset: usize);

    /// Pause or resume output.
    fn pause_resume(&mut self, command: PauseResume);

    /// Stop output entirely.
    fn stop(&mut self);
}
