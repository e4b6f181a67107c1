//! LED controller: blink or hold LED3 depending on the current mode.

use embedded_hal::digital::StatefulOutputPin;
use embedded_hal_async::delay::DelayNs;
use platform::config::LED_TICK_MS;
use platform::Led;

use crate::signal::{poll_signal, SignalReceiver};

/// LED display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedMode {
    /// Toggle every tick.
    Blinking,
    /// Drive on every tick.
    SolidOn,
}

impl LedMode {
    /// The other mode.
    pub const fn flip(self) -> Self {
        match self {
            Self::Blinking => Self::SolidOn,
            Self::SolidOn => Self::Blinking,
        }
    }

    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blinking => "blinking",
            Self::SolidOn => "solid on",
        }
    }
}

/// LED controller task state.
pub struct LedController<'a, P, D> {
    led: Led<P>,
    delay: D,
    rx: SignalReceiver<'a>,
    mode: LedMode,
}

impl<'a, P: StatefulOutputPin, D: DelayNs> LedController<'a, P, D> {
    /// Create a controller in [`LedMode::Blinking`].
    pub fn new(led: Led<P>, delay: D, rx: SignalReceiver<'a>) -> Self {
        Self {
            led,
            delay,
            rx,
            mode: LedMode::Blinking,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> LedMode {
        self.mode
    }

    /// Apply at most one pending signal, then drive the LED for the mode.
    pub fn tick(&mut self) -> LedMode {
        if poll_signal(&self.rx) {
            self.mode = self.mode.flip();
            platform::log_info!("{}: mode -> {}", self.led.id().as_str(), self.mode.as_str());
        }
        match self.mode {
            LedMode::Blinking => self.led.toggle(),
            LedMode::SolidOn => self.led.on(),
        }
        self.mode
    }

    /// One tick followed by the tick delay.
    pub async fn step(&mut self) -> LedMode {
        let mode = self.tick();
        self.delay.delay_ms(LED_TICK_MS).await;
        mode
    }

    /// Run forever.
    pub async fn run(mut self) -> ! {
        platform::log_info!("led controller started");
        loop {
            self.step().await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::signal::{try_signal, SignalChannel};
    use platform::mocks::{LedEvent, MockDelay, MockLed};
    use platform::LedId;

    fn controller<'a>(
        q: &'a SignalChannel,
        pin: MockLed,
        delay: MockDelay,
    ) -> LedController<'a, MockLed, MockDelay> {
        LedController::new(Led::new(pin, LedId::Orange), delay, q.receiver())
    }

    #[test]
    fn test_starts_blinking() {
        let q = SignalChannel::new();
        let pin = MockLed::new();
        let probe = pin.probe();
        let mut ctrl = controller(&q, pin, MockDelay::new());

        assert_eq!(ctrl.tick(), LedMode::Blinking);
        assert_eq!(ctrl.tick(), LedMode::Blinking);
        assert_eq!(probe.events(), [LedEvent::Toggle, LedEvent::Toggle]);
        assert!(!probe.is_on());
    }

    #[test]
    fn test_signal_switches_to_solid_on() {
        let q = SignalChannel::new();
        let pin = MockLed::new();
        let probe = pin.probe();
        let mut ctrl = controller(&q, pin, MockDelay::new());

        assert!(try_signal(&q.sender()));
        assert_eq!(ctrl.tick(), LedMode::SolidOn);
        assert_eq!(ctrl.tick(), LedMode::SolidOn);
        assert_eq!(probe.events(), [LedEvent::On, LedEvent::On]);
        assert!(probe.is_on());
    }

    #[test]
    fn test_at_most_one_flip_per_tick() {
        let q = SignalChannel::new();
        let mut ctrl = controller(&q, MockLed::new(), MockDelay::new());
        let tx = q.sender();
        for _ in 0..3 {
            assert!(try_signal(&tx));
        }

        assert_eq!(ctrl.tick(), LedMode::SolidOn);
        assert_eq!(ctrl.tick(), LedMode::Blinking);
        assert_eq!(ctrl.tick(), LedMode::SolidOn);
        assert_eq!(ctrl.tick(), LedMode::SolidOn);
    }

    #[tokio::test]
    async fn test_step_sleeps_one_tick() {
        let q = SignalChannel::new();
        let delay = MockDelay::new();
        let mut ctrl = controller(&q, MockLed::new(), delay.clone());

        ctrl.step().await;
        ctrl.step().await;
        assert_eq!(delay.delays(), [LED_TICK_MS, LED_TICK_MS]);
    }
}
