//! Pause/resume control state machine.
//!
//! `PauseResumeControl` is a pure, `no_std`, allocation-free state machine
//! that turns "toggle" signals into pause and resume commands for the
//! playback engine. It has **no** I/O: the audio task feeds it signals and
//! carries out the [`ControlAction`] it returns once per tick.
//!
//! ```text
//!            signal, pausing = false
//!   Steady ─────────────────────────▶ PauseRequested ── tick: Pause ──▶ Steady
//!            signal, pausing = true
//!   Steady ─────────────────────────▶ ResumeRequested ─ tick: Resume ─▶ Steady
//! ```
//!
//! A signal always overwrites a still-pending request and flips the pausing
//! toggle, so the Kth signal requests a pause when K is odd and a resume when
//! K is even.

/// Pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlState {
    /// The next tick pauses the engine.
    PauseRequested,
    /// The next tick resumes the engine.
    ResumeRequested,
    /// Nothing pending; the indicator runs its heartbeat.
    Steady,
}

impl ControlState {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PauseRequested => "pause requested",
            Self::ResumeRequested => "resume requested",
            Self::Steady => "steady",
        }
    }
}

/// What the audio task must do on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlAction {
    /// Pause the engine and switch the indicator on.
    Pause,
    /// Resume the engine; the indicator is left alone.
    Resume,
    /// Toggle the indicator.
    Heartbeat,
    /// Stop the engine (forced-stop override).
    Stop,
}

impl ControlAction {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Heartbeat => "heartbeat",
            Self::Stop => "stop",
        }
    }
}

/// Pause/resume request tracker for the audio task.
#[derive(Debug, Clone)]
pub struct PauseResumeControl {
    state: ControlState,
    pausing: bool,
    forced_stop: bool,
}

impl PauseResumeControl {
    /// Start idle: no request pending and the first signal pauses.
    pub const fn new() -> Self {
        Self {
            state: ControlState::Steady,
            pausing: false,
            forced_stop: false,
        }
    }

    /// Set the forced-stop override. While set, every tick stops the engine
    /// and no signal is consumed. Nothing in the running firmware sets it.
    #[must_use]
    pub const fn with_forced_stop(mut self) -> Self {
        self.forced_stop = true;
        self
    }

    /// Record one toggle signal.
    pub fn on_signal(&mut self) {
        self.state = if self.pausing {
            ControlState::ResumeRequested
        } else {
            ControlState::PauseRequested
        };
        self.pausing = !self.pausing;
    }

    /// Consume the pending request and report what to do this tick.
    ///
    /// `Pause` and `Resume` collapse back into `Steady` immediately.
    pub fn next_action(&mut self) -> ControlAction {
        if self.forced_stop {
            return ControlAction::Stop;
        }
        match self.state {
            ControlState::PauseRequested => {
                self.state = ControlState::Steady;
                ControlAction::Pause
            }
            ControlState::ResumeRequested => {
                self.state = ControlState::Steady;
                ControlAction::Resume
            }
            ControlState::Steady => ControlAction::Heartbeat,
        }
    }

    /// Run one tick. `poll` is asked for a pending signal only when the
    /// forced-stop override is clear, so a stopped engine leaves its queue
    /// untouched.
    pub fn step(&mut self, poll: impl FnOnce() -> bool) -> ControlAction {
        if !self.forced_stop && poll() {
            self.on_signal();
        }
        self.next_action()
    }

    /// Current request state.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Whether the next signal requests a resume.
    pub fn is_pausing(&self) -> bool {
        self.pausing
    }

    /// Whether the forced-stop override is set.
    pub fn is_forced_stop(&self) -> bool {
        self.forced_stop
    }
}

impl Default for PauseResumeControl {
    fn default() -> Self {
        Self::new()
    }
}
