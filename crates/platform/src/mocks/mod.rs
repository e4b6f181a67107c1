//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform seams for use in
//! unit tests, integration tests and the host simulation.
//!
//! Each mock hands out a cheap cloneable *probe* that shares its state, so a
//! test can move the mock into a task and still inspect what the task did.

#![cfg(any(test, feature = "std"))]

use std::collections::VecDeque;
use std::string::String;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::audio::{AudioPlayer, PauseResume};
use crate::storage::{push_lossy, Line, LineRead, StorageError, Volume, VolumeId};

fn with_log<T, R>(log: &Mutex<T>, f: impl FnOnce(&mut T) -> R) -> Option<R> {
    log.lock().ok().map(|mut guard| f(&mut guard))
}

// ── LED ──────────────────────────────────────────────────────────────────────

/// Write observed on a [`MockLed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedEvent {
    /// Driven high.
    On,
    /// Driven low.
    Off,
    /// Inverted.
    Toggle,
}

#[derive(Default)]
struct LedShared {
    level: AtomicBool,
    events: Mutex<Vec<LedEvent>>,
}

/// Mock stateful output pin
pub struct MockLed {
    name: &'static str,
    shared: Arc<LedShared>,
}

impl MockLed {
    /// Create a new mock LED, initially off.
    pub fn new() -> Self {
        Self::named("led")
    }

    /// Create a mock LED that reports its changes under `name` in the logs.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            shared: Arc::new(LedShared::default()),
        }
    }

    /// Handle for inspecting this LED after it has been moved.
    pub fn probe(&self) -> LedProbe {
        LedProbe {
            shared: Arc::clone(&self.shared),
        }
    }

    fn record(&self, event: LedEvent, level: bool) {
        self.shared.level.store(level, Ordering::SeqCst);
        with_log(&self.shared.events, |events| events.push(event));
        crate::log_debug!("{} -> {}", self.name, if level { "on" } else { "off" });
    }
}

impl Default for MockLed {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(LedEvent::On, true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(LedEvent::Off, false);
        Ok(())
    }
}

impl StatefulOutputPin for MockLed {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.shared.level.load(Ordering::SeqCst))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.shared.level.load(Ordering::SeqCst))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let level = !self.shared.level.load(Ordering::SeqCst);
        self.record(LedEvent::Toggle, level);
        Ok(())
    }
}

/// Shared view of a [`MockLed`].
#[derive(Clone)]
pub struct LedProbe {
    shared: Arc<LedShared>,
}

impl LedProbe {
    /// Current output level.
    pub fn is_on(&self) -> bool {
        self.shared.level.load(Ordering::SeqCst)
    }

    /// Every write so far, oldest first.
    pub fn events(&self) -> Vec<LedEvent> {
        with_log(&self.shared.events, |events| events.clone()).unwrap_or_default()
    }

    /// Number of toggles so far.
    pub fn toggles(&self) -> usize {
        self.count(LedEvent::Toggle)
    }

    /// Number of explicit "on" writes so far.
    pub fn ons(&self) -> usize {
        self.count(LedEvent::On)
    }

    /// Number of explicit "off" writes so far.
    pub fn offs(&self) -> usize {
        self.count(LedEvent::Off)
    }

    /// Forget recorded events (the level is kept).
    pub fn clear(&self) {
        with_log(&self.shared.events, Vec::clear);
    }

    fn count(&self, kind: LedEvent) -> usize {
        with_log(&self.shared.events, |events| {
            events.iter().filter(|e| **e == kind).count()
        })
        .unwrap_or(0)
    }
}

// ── Button ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ButtonShared {
    script: Mutex<VecDeque<bool>>,
    level: AtomicBool,
    reads: AtomicU32,
}

/// Mock input pin that replays a script of levels.
///
/// Each read pops the next scripted level (`true` = high). Once the script is
/// exhausted the pin holds the last level, which a [`ButtonHandle`] can change
/// at any time.
pub struct ScriptedButton {
    shared: Arc<ButtonShared>,
}

impl ScriptedButton {
    /// Create a pin replaying `levels`.
    pub fn new(levels: &[bool]) -> Self {
        let shared = ButtonShared {
            script: Mutex::new(levels.iter().copied().collect()),
            ..ButtonShared::default()
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Script `presses` complete press/release cycles: each press reads high
    /// `held_polls` times, then low once.
    pub fn presses(presses: usize, held_polls: usize) -> Self {
        let mut levels = Vec::new();
        for _ in 0..presses {
            levels.extend(core::iter::repeat(true).take(held_polls.max(1)));
            levels.push(false);
        }
        Self::new(&levels)
    }

    /// Handle for driving and inspecting the pin after it has been moved.
    pub fn handle(&self) -> ButtonHandle {
        ButtonHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn read(&self) -> bool {
        self.shared.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(level) = with_log(&self.shared.script, VecDeque::pop_front).flatten() {
            self.shared.level.store(level, Ordering::SeqCst);
        }
        self.shared.level.load(Ordering::SeqCst)
    }
}

impl ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read())
    }
}

/// Shared handle to a [`ScriptedButton`].
#[derive(Clone)]
pub struct ButtonHandle {
    shared: Arc<ButtonShared>,
}

impl ButtonHandle {
    /// Hold the pin high.
    pub fn press(&self) {
        self.shared.level.store(true, Ordering::SeqCst);
    }

    /// Hold the pin low.
    pub fn release(&self) {
        self.shared.level.store(false, Ordering::SeqCst);
    }

    /// Number of reads so far.
    pub fn reads(&self) -> u32 {
        self.shared.reads.load(Ordering::SeqCst)
    }

    /// Whether scripted levels remain.
    pub fn script_pending(&self) -> bool {
        with_log(&self.shared.script, |script| !script.is_empty()).unwrap_or(false)
    }
}

// ── Delay ────────────────────────────────────────────────────────────────────

/// Mock delay that records every request (in milliseconds) and returns after
/// a single cooperative yield.
#[derive(Clone, Default)]
pub struct MockDelay {
    log: Arc<Mutex<Vec<u32>>>,
}

impl MockDelay {
    /// Create a new recording delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in milliseconds.
    pub fn delays(&self) -> Vec<u32> {
        with_log(&self.log, |log| log.clone()).unwrap_or_default()
    }

    /// Sum of all delays requested so far, in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.delays().iter().map(|ms| u64::from(*ms)).sum()
    }

    /// Forget recorded delays.
    pub fn clear(&self) {
        with_log(&self.log, Vec::clear);
    }

    async fn record(&mut self, ms: u32) {
        with_log(&self.log, |log| log.push(ms));
        embassy_futures::yield_now().await;
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000).await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(us / 1_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms).await;
    }
}

// ── Audio player ─────────────────────────────────────────────────────────────

/// Call observed on a [`MockPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// `initialize(sample_rate_hz)`
    Initialize(u32),
    /// `play(samples, total_len, offset)`, with `samples.len()`.
    Play {
        /// Length of the sample slice.
        samples: usize,
        /// Size of the whole table.
        total_len: usize,
        /// Header length.
        offset: usize,
    },
    /// `pause_resume(command)`
    PauseResume(PauseResume),
    /// `stop()`
    Stop,
}

/// Mock playback engine
#[derive(Clone, Default)]
pub struct MockPlayer {
    events: Arc<Mutex<Vec<PlayerEvent>>>,
}

impl MockPlayer {
    /// Create a new mock player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn events(&self) -> Vec<PlayerEvent> {
        with_log(&self.events, |events| events.clone()).unwrap_or_default()
    }

    /// Pause/resume commands only, oldest first.
    pub fn commands(&self) -> Vec<PauseResume> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PlayerEvent::PauseResume(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    /// Number of `stop()` calls.
    pub fn stops(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, PlayerEvent::Stop))
            .count()
    }

    fn push(&self, event: PlayerEvent) {
        with_log(&self.events, |events| events.push(event));
    }
}

impl AudioPlayer for MockPlayer {
    fn initialize(&mut self, sample_rate_hz: u32) {
        crate::log_info!("player: initialize at {} Hz", sample_rate_hz);
        self.push(PlayerEvent::Initialize(sample_rate_hz));
    }

    fn play(&mut self, samples: &'static [u8], total_len: usize, offset: usize) {
        crate::log_info!("player: play {} bytes from offset {}", samples.len(), offset);
        self.push(PlayerEvent::Play {
            samples: samples.len(),
            total_len,
            offset,
        });
    }

    fn pause_resume(&mut self, command: PauseResume) {
        crate::log_info!("player: {}", command.as_str());
        self.push(PlayerEvent::PauseResume(command));
    }

    fn stop(&mut self) {
        crate::log_info!("player: stop");
        self.push(PlayerEvent::Stop);
    }
}

// ── Volume ───────────────────────────────────────────────────────────────────

/// Counters kept by a [`MockVolume`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeLog {
    /// Calls to `mount`.
    pub mount_attempts: u32,
    /// Calls to `mount` that succeeded.
    pub mounts: u32,
    /// Calls to `open`.
    pub open_attempts: u32,
    /// Calls to `open` that succeeded.
    pub opens: u32,
    /// Calls to `read_line` that returned a line.
    pub lines_read: u32,
    /// Calls to `read_line` that returned end-of-file.
    pub eof_reads: u32,
    /// Calls to `close`.
    pub closes: u32,
    /// Calls to `unmount`.
    pub unmounts: u32,
}

struct VolumeState {
    mount_failures_left: u32,
    open_failures_left: u32,
    lines: Vec<String>,
    mounted: bool,
    log: VolumeLog,
}

/// Open-file handle of a [`MockVolume`].
pub struct MockFile {
    next_line: usize,
}

/// Mock volume with scripted mount/open failures and fixed file content.
#[derive(Clone)]
pub struct MockVolume {
    state: Arc<Mutex<VolumeState>>,
}

impl MockVolume {
    /// A volume that fails to mount `mount_failures` times, fails to open
    /// `open_failures` times, and serves `lines` (without newlines).
    pub fn new(mount_failures: u32, open_failures: u32, lines: &[&str]) -> Self {
        let state = VolumeState {
            mount_failures_left: mount_failures,
            open_failures_left: open_failures,
            lines: lines.iter().map(|l| format!("{l}\n")).collect(),
            mounted: false,
            log: VolumeLog::default(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the call counters.
    pub fn log(&self) -> VolumeLog {
        with_log(&self.state, |s| s.log.clone()).unwrap_or_default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut VolumeState) -> R) -> Result<R, StorageError> {
        with_log(&self.state, f).ok_or(StorageError::Io)
    }
}

impl Volume for MockVolume {
    type Error = StorageError;
    type File = MockFile;

    async fn mount(&mut self, _id: VolumeId) -> Result<(), Self::Error> {
        self.with_state(|s| {
            s.log.mount_attempts = s.log.mount_attempts.saturating_add(1);
            if s.mount_failures_left > 0 {
                s.mount_failures_left = s.mount_failures_left.saturating_sub(1);
                return Err(StorageError::NoMedia);
            }
            s.mounted = true;
            s.log.mounts = s.log.mounts.saturating_add(1);
            Ok(())
        })?
    }

    async fn open(&mut self, _path: &str) -> Result<Self::File, Self::Error> {
        self.with_state(|s| {
            s.log.open_attempts = s.log.open_attempts.saturating_add(1);
            if !s.mounted {
                return Err(StorageError::NotMounted);
            }
            if s.open_failures_left > 0 {
                s.open_failures_left = s.open_failures_left.saturating_sub(1);
                return Err(StorageError::NotFound);
            }
            s.log.opens = s.log.opens.saturating_add(1);
            Ok(MockFile { next_line: 0 })
        })?
    }

    async fn read_line(
        &mut self,
        file: &mut Self::File,
        line: &mut Line,
    ) -> Result<LineRead, Self::Error> {
        line.clear();
        self.with_state(|s| match s.lines.get(file.next_line) {
            Some(text) => {
                push_lossy(line, text.as_bytes());
                file.next_line = file.next_line.saturating_add(1);
                s.log.lines_read = s.log.lines_read.saturating_add(1);
                LineRead::Line
            }
            None => {
                s.log.eof_reads = s.log.eof_reads.saturating_add(1);
                LineRead::EndOfFile
            }
        })
    }

    async fn close(&mut self, _file: Self::File) -> Result<(), Self::Error> {
        self.with_state(|s| s.log.closes = s.log.closes.saturating_add(1))
    }

    async fn unmount(&mut self, _id: VolumeId) -> Result<(), Self::Error> {
        self.with_state(|s| {
            s.mounted = false;
            s.log.unmounts = s.log.unmounts.saturating_add(1);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn mock_led_records_writes() {
        let mut led = MockLed::new();
        let probe = led.probe();

        led.set_high().unwrap();
        led.toggle().unwrap();
        led.toggle().unwrap();

        assert!(probe.is_on());
        assert_eq!(
            probe.events(),
            [LedEvent::On, LedEvent::Toggle, LedEvent::Toggle]
        );
        assert_eq!(probe.toggles(), 2);
    }

    #[test]
    fn scripted_button_holds_last_level() {
        let mut pin = ScriptedButton::new(&[true, false]);
        let handle = pin.handle();

        assert!(pin.is_high().unwrap());
        assert!(pin.is_low().unwrap());
        assert!(pin.is_low().unwrap());
        handle.press();
        assert!(pin.is_high().unwrap());
        assert_eq!(handle.reads(), 4);
    }

    #[tokio::test]
    async fn mock_delay_records_milliseconds() {
        let mut delay = MockDelay::new();
        let view = delay.clone();

        delay.delay_ms(500).await;
        delay.delay_us(2_000).await;

        assert_eq!(view.delays(), [500, 2]);
        assert_eq!(view.total_ms(), 502);
    }

    #[tokio::test]
    async fn mock_volume_scripts_failures() {
        let mut volume = MockVolume::new(1, 1, &["a"]);
        let view = volume.clone();

        assert_eq!(volume.mount(VolumeId(0)).await, Err(StorageError::NoMedia));
        volume.mount(VolumeId(0)).await.unwrap();
        assert!(volume.open("X").await.is_err());
        let mut file = volume.open("X").await.unwrap();

        let mut line = Line::new();
        assert_eq!(
            volume.read_line(&mut file, &mut line).await.unwrap(),
            LineRead::Line
        );
        assert_eq!(line.as_str(), "a\n");
        assert_eq!(
            volume.read_line(&mut file, &mut line).await.unwrap(),
            LineRead::EndOfFile
        );

        let log = view.log();
        assert_eq!(log.mount_attempts, 2);
        assert_eq!(log.mounts, 1);
        assert_eq!(log.open_attempts, 2);
        assert_eq!(log.opens, 1);
        assert_eq!(log.lines_read, 1);
        assert_eq!(log.eof_reads, 1);
    }

    #[test]
    fn mock_player_records_commands() {
        let mut player = MockPlayer::new();
        let view = player.clone();

        player.initialize(48_000);
        player.pause_resume(PauseResume::Pause);
        player.pause_resume(PauseResume::Resume);
        player.stop();

        assert_eq!(view.commands(), [PauseResume::Pause, PauseResume::Resume]);
        assert_eq!(view.stops(), 1);
        assert_eq!(view.events()[0], PlayerEvent::Initialize(48_000));
    }
}
