//! CS43L22 playback engine front end.
//!
//! Tracks the engine state the audio controller drives (initialised, playing,
//! paused, stopped) and reports every transition over defmt. The sample
//! stream itself belongs to the codec service behind [`AudioPlayer`]: the
//! I2S3 transfer to the CS43L22 (PC7 MCK, PC10 SCK, PC12 SD, PA4 WS, control
//! over I2C1 on PB6/PB9, reset on PD4) is outside this firmware, and this
//! type only records the commands it would receive.

use platform::{AudioPlayer, PauseResume};

/// Engine state as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// `initialize` not called yet.
    Off,
    /// Output path configured, nothing queued.
    Ready,
    /// Streaming samples.
    Playing,
    /// Output suspended, position kept.
    Paused,
    /// Output stopped.
    Stopped,
}

/// Playback engine for the on-board CS43L22 DAC.
pub struct CodecPlayer {
    state: EngineState,
    sample_rate_hz: u32,
    samples: &'static [u8],
}

impl CodecPlayer {
    /// Create an engine that has not been initialised.
    pub const fn new() -> Self {
        Self {
            state: EngineState::Off,
            sample_rate_hz: 0,
            samples: &[],
        }
    }

    /// Current engine state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Sample rate passed to [`AudioPlayer::initialize`].
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Samples queued by the last [`AudioPlayer::play`].
    pub fn samples(&self) -> &'static [u8] {
        self.samples
    }
}

impl Default for CodecPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for CodecPlayer {
    fn initialize(&mut self, sample_rate_hz: u32) {
        self.sample_rate_hz = sample_rate_hz;
        self.state = EngineState::Ready;
        platform::log_info!("codec: output at {} Hz", sample_rate_hz);
    }

    fn play(&mut self, samples: &'static [u8], total_len: usize, offset: usize) {
        self.samples = samples;
        self.state = EngineState::Playing;
        platform::log_info!(
            "codec: play {} of {} bytes (header {})",
            samples.len(),
            total_len,
            offset
        );
    }

    fn pause_resume(&mut self, command: PauseResume) {
        if self.state == EngineState::Off || self.state == EngineState::Stopped {
            platform::log_warn!("codec: {} ignored, nothing playing", command.as_str());
            return;
        }
        self.state = match command {
            PauseResume::Pause => EngineState::Paused,
            PauseResume::Resume => EngineState::Playing,
        };
        platform::log_debug!("codec: {} (flag {})", command.as_str(), command.flag());
    }

    fn stop(&mut self) {
        if self.state != EngineState::Stopped {
            platform::log_info!("codec: stop");
        }
        self.state = EngineState::Stopped;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    static SAMPLES: [u8; 8] = [0; 8];

    #[test]
    fn test_engine_follows_commands() {
        let mut codec = CodecPlayer::new();
        assert_eq!(codec.state(), EngineState::Off);

        codec.initialize(48_000);
        codec.play(&SAMPLES, 10, 2);
        assert_eq!(codec.state(), EngineState::Playing);
        assert_eq!(codec.samples().len(), 8);

        codec.pause_resume(PauseResume::Pause);
        assert_eq!(codec.state(), EngineState::Paused);
        codec.pause_resume(PauseResume::Resume);
        assert_eq!(codec.state(), EngineState::Playing);

        codec.stop();
        codec.pause_resume(PauseResume::Resume);
        assert_eq!(codec.state(), EngineState::Stopped);
    }

    #[test]
    fn test_pause_before_initialize_is_ignored() {
        let mut codec = CodecPlayer::new();
        codec.pause_resume(PauseResume::Pause);
        assert_eq!(codec.state(), EngineState::Off);
        assert_eq!(codec.sample_rate_hz(), 0);
    }
}
