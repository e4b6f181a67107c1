//! User button monitor.
//!
//! Polls the user button and turns every completed press/release cycle into
//! exactly one signal. Presses alternate between the LED queue and the audio
//! queue, starting with the LED queue.
//!
//! Holding the button does not repeat: once a press is seen the monitor waits
//! in `BUTTON_RELEASE_POLL_MS` steps until the input de-asserts, which also
//! debounces the release. While the button is idle the monitor sleeps
//! `BUTTON_IDLE_POLL_MS` between samples so lower-priority work on the same
//! executor still runs.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use platform::config::{BUTTON_IDLE_POLL_MS, BUTTON_RELEASE_POLL_MS};
use platform::UserButton;

use crate::signal::{try_signal, SignalSender};

/// Queue the next completed press is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// LED controller queue.
    Led,
    /// Audio controller queue.
    Audio,
}

impl Route {
    /// The other queue.
    pub const fn flip(self) -> Self {
        match self {
            Self::Led => Self::Audio,
            Self::Audio => Self::Led,
        }
    }

    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Led => "led",
            Self::Audio => "audio",
        }
    }
}

/// Result of one dispatched press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Queue the signal was offered to.
    pub route: Route,
    /// `false` when the queue was full and the signal was dropped.
    pub delivered: bool,
}

/// Button monitor task state.
pub struct ButtonMonitor<'a, P, D> {
    button: UserButton<P>,
    delay: D,
    led_tx: SignalSender<'a>,
    audio_tx: SignalSender<'a>,
    next: Route,
    dropped: u32,
}

impl<'a, P: InputPin, D: DelayNs> ButtonMonitor<'a, P, D> {
    /// Create a monitor that sends to `led_tx` and `audio_tx`.
    pub fn new(
        button: UserButton<P>,
        delay: D,
        led_tx: SignalSender<'a>,
        audio_tx: SignalSender<'a>,
    ) -> Self {
        Self {
            button,
            delay,
            led_tx,
            audio_tx,
            next: Route::Led,
            dropped: 0,
        }
    }

    /// Queue the next press goes to.
    pub fn next_route(&self) -> Route {
        self.next
    }

    /// Signals dropped on full queues so far.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Sample the button once.
    ///
    /// On a press, waits for the release and dispatches one signal. Otherwise
    /// sleeps one idle poll interval and returns `None`.
    pub async fn poll(&mut self) -> Option<Dispatch> {
        if !self.button.is_pressed() {
            self.delay.delay_ms(BUTTON_IDLE_POLL_MS).await;
            return None;
        }
        while self.button.is_pressed() {
            self.delay.delay_ms(BUTTON_RELEASE_POLL_MS).await;
        }
        Some(self.dispatch())
    }

    /// Offer one signal to the current route and flip the route.
    fn dispatch(&mut self) -> Dispatch {
        let route = self.next;
        let tx = match route {
            Route::Led => &self.led_tx,
            Route::Audio => &self.audio_tx,
        };
        let delivered = try_signal(tx);
        if delivered {
            platform::log_debug!("button: signal -> {} queue", route.as_str());
        } else {
            self.dropped = self.dropped.saturating_add(1);
            platform::log_warn!("button: {} queue full, signal dropped", route.as_str());
        }
        self.next = route.flip();
        Dispatch { route, delivered }
    }

    /// Run forever.
    pub async fn run(mut self) -> ! {
        platform::log_info!("button monitor started");
        loop {
            self.poll().await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::signal::{poll_signal, SignalChannel};
    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
    use platform::mocks::{MockDelay, ScriptedButton};

    #[test]
    fn test_route_flip() {
        assert_eq!(Route::Led.flip(), Route::Audio);
        assert_eq!(Route::Audio.flip(), Route::Led);
    }

    #[test]
    fn test_idle_poll_sleeps_and_sends_nothing() {
        let led_q = SignalChannel::new();
        let audio_q = SignalChannel::new();
        let delay = MockDelay::new();
        let mut monitor = ButtonMonitor::new(
            UserButton::active_high(ScriptedButton::new(&[false])),
            delay.clone(),
            led_q.sender(),
            audio_q.sender(),
        );

        assert_eq!(block_on(monitor.poll()), None);
        assert_eq!(delay.delays(), [BUTTON_IDLE_POLL_MS]);
        assert!(!poll_signal(&led_q.receiver()));
        assert!(!poll_signal(&audio_q.receiver()));
    }

    #[test]
    fn test_held_press_waits_for_release() {
        let led_q = SignalChannel::new();
        let audio_q = SignalChannel::new();
        let delay = MockDelay::new();
        // pressed, still pressed twice, released
        let mut monitor = ButtonMonitor::new(
            UserButton::active_high(ScriptedButton::new(&[true, true, true, false])),
            delay.clone(),
            led_q.sender(),
            audio_q.sender(),
        );

        let dispatch = block_on(monitor.poll()).unwrap();
        assert_eq!(dispatch.route, Route::Led);
        assert!(dispatch.delivered);
        assert_eq!(delay.delays(), [BUTTON_RELEASE_POLL_MS, BUTTON_RELEASE_POLL_MS]);
        assert!(poll_signal(&led_q.receiver()));
        assert!(!poll_signal(&led_q.receiver()));
        assert_eq!(monitor.next_route(), Route::Audio);
    }

    #[test]
    fn test_press_shorter_than_poll_is_delivered_once() {
        let led_q = SignalChannel::new();
        let audio_q = SignalChannel::new();
        // Exact read transcript: seen pressed, released on the very next read.
        let pin = PinMock::new(&[
            Transaction::get(State::High),
            Transaction::get(State::Low),
            Transaction::get(State::Low),
        ]);
        let mut monitor = ButtonMonitor::new(
            UserButton::active_high(pin),
            NoopDelay::new(),
            led_q.sender(),
            audio_q.sender(),
        );

        assert!(block_on(monitor.poll()).is_some());
        assert_eq!(block_on(monitor.poll()), None);

        let rx = led_q.receiver();
        assert!(poll_signal(&rx));
        assert!(!poll_signal(&rx));
        assert!(!poll_signal(&audio_q.receiver()));

        monitor.button.into_inner().done();
    }

    #[test]
    fn test_full_queue_drops_silently() {
        let led_q = SignalChannel::new();
        let audio_q = SignalChannel::new();
        let mut monitor = ButtonMonitor::new(
            UserButton::active_high(ScriptedButton::presses(24, 1)),
            MockDelay::new(),
            led_q.sender(),
            audio_q.sender(),
        );

        let mut dispatched = 0;
        while dispatched < 24 {
            if block_on(monitor.poll()).is_some() {
                dispatched += 1;
            }
        }

        // 12 presses per queue, 10 fit in each.
        assert_eq!(monitor.dropped(), 4);
        let count = |q: &SignalChannel| {
            let rx = q.receiver();
            core::iter::from_fn(|| poll_signal(&rx).then_some(())).count()
        };
        assert_eq!(count(&led_q), 10);
        assert_eq!(count(&audio_q), 10);
    }
}
