//! Audio controller: pause and resume the playback engine on signal.
//!
//! Playback of the flash table starts once when the task starts. After that
//! every 200 ms tick feeds at most one queued signal into
//! [`PauseResumeControl`] and carries out the resulting action:
//!
//! | Action      | Engine          | LED6 (blue) |
//! |-------------|-----------------|-------------|
//! | `Pause`     | `pause_resume(Pause)`  | on   |
//! | `Resume`    | `pause_resume(Resume)` | -    |
//! | `Heartbeat` | -               | toggle      |
//! | `Stop`      | `stop()`        | -           |

use embedded_hal::digital::StatefulOutputPin;
use embedded_hal_async::delay::DelayNs;
use platform::config::{AUDIO_SAMPLE_RATE_HZ, AUDIO_TICK_MS};
use platform::{AudioPlayer, Led};
use playback::{engine_command, AudioPayload, ControlAction, PauseResumeControl};

use crate::signal::{poll_signal, SignalReceiver};

/// Audio controller task state.
pub struct AudioController<'a, A, P, D> {
    player: A,
    indicator: Led<P>,
    delay: D,
    rx: SignalReceiver<'a>,
    payload: AudioPayload,
    control: PauseResumeControl,
    started: bool,
}

impl<'a, A: AudioPlayer, P: StatefulOutputPin, D: DelayNs> AudioController<'a, A, P, D> {
    /// Create a controller that will play `payload` on `player`.
    pub fn new(
        player: A,
        indicator: Led<P>,
        delay: D,
        rx: SignalReceiver<'a>,
        payload: AudioPayload,
    ) -> Self {
        Self {
            player,
            indicator,
            delay,
            rx,
            payload,
            control: PauseResumeControl::new(),
            started: false,
        }
    }

    /// Replace the control state machine (e.g. one with the forced-stop
    /// override set).
    #[must_use]
    pub fn with_control(mut self, control: PauseResumeControl) -> Self {
        self.control = control;
        self
    }

    /// Control state machine.
    pub fn control(&self) -> &PauseResumeControl {
        &self.control
    }

    /// Bring up the engine and start playback. Only the first call has an
    /// effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.player.initialize(AUDIO_SAMPLE_RATE_HZ);
        self.player.play(
            self.payload.samples(),
            self.payload.total_size(),
            self.payload.start_offset(),
        );
        self.started = true;
        platform::log_info!(
            "audio: playing {} bytes at {} Hz",
            self.payload.samples().len(),
            AUDIO_SAMPLE_RATE_HZ
        );
    }

    /// Run one control tick without sleeping.
    pub fn tick(&mut self) -> ControlAction {
        let rx = &self.rx;
        let action = self.control.step(|| poll_signal(rx));
        if let Some(command) = engine_command(action) {
            self.player.pause_resume(command);
            platform::log_info!("audio: {}", action.as_str());
        }
        match action {
            ControlAction::Pause => self.indicator.on(),
            ControlAction::Heartbeat => self.indicator.toggle(),
            ControlAction::Stop => self.player.stop(),
            ControlAction::Resume => {}
        }
        action
    }

    /// One tick followed by the tick delay.
    pub async fn step(&mut self) -> ControlAction {
        let action = self.tick();
        self.delay.delay_ms(AUDIO_TICK_MS).await;
        action
    }

    /// Start playback and run forever.
    pub async fn run(mut self) -> ! {
        self.start();
        loop {
            self.step().await;
        }
    }
}
