//! Status LED and push-button wrappers over embedded-hal 1.0 pins.
//!
//! The signaling tasks treat LED writes and button reads as infallible. Pin
//! drivers still report errors through `embedded_hal::digital::ErrorType`, so
//! these wrappers log a failure and carry on instead of propagating it.
//!
//! # Discovery board assignment
//!
//! | LED      | Colour | MCU pin | Used by                           |
//! |----------|--------|---------|-----------------------------------|
//! | LED3     | orange | PD13    | LED controller (blink / solid)    |
//! | LED4     | green  | PD12    | storage reader (line progress)    |
//! | LED5     | red    | PD14    | storage reader (wait / heartbeat) |
//! | LED6     | blue   | PD15    | audio controller (indicator)      |
//!
//! The user button sits on PA0 and reads high while pressed.

use embedded_hal::digital::{InputPin, StatefulOutputPin};

/// Board LED identity, used for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedId {
    /// LED3, orange.
    Orange,
    /// LED4, green.
    Green,
    /// LED5, red.
    Red,
    /// LED6, blue.
    Blue,
}

impl LedId {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "LED3/orange",
            Self::Green => "LED4/green",
            Self::Red => "LED5/red",
            Self::Blue => "LED6/blue",
        }
    }
}

/// A status LED driven through a stateful output pin.
pub struct Led<P> {
    pin: P,
    id: LedId,
}

impl<P: StatefulOutputPin> Led<P> {
    /// Wrap `pin` as LED `id`. The pin level is left untouched.
    pub fn new(pin: P, id: LedId) -> Self {
        Self { pin, id }
    }

    /// Which board LED this is.
    pub fn id(&self) -> LedId {
        self.id
    }

    /// Switch the LED on.
    pub fn on(&mut self) {
        if self.pin.set_high().is_err() {
            crate::log_warn!("{}: set_high failed", self.id.as_str());
        }
    }

    /// Switch the LED off.
    pub fn off(&mut self) {
        if self.pin.set_low().is_err() {
            crate::log_warn!("{}: set_low failed", self.id.as_str());
        }
    }

    /// Invert the LED.
    pub fn toggle(&mut self) {
        if self.pin.toggle().is_err() {
            crate::log_warn!("{}: toggle failed", self.id.as_str());
        }
    }

    /// Whether the LED is currently driven on. A read failure reports `false`.
    pub fn is_on(&mut self) -> bool {
        self.pin.is_set_high().unwrap_or(false)
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed reads high (Discovery user button, external pull-down).
    High,
    /// Pressed reads low (button to ground with pull-up).
    Low,
}

/// A polled push button.
pub struct UserButton<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P: InputPin> UserButton<P> {
    /// Button that reads high while pressed.
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active: ActiveLevel::High,
        }
    }

    /// Button that reads low while pressed.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active: ActiveLevel::Low,
        }
    }

    /// Sample the input. A read failure is reported as "not pressed".
    pub fn is_pressed(&mut self) -> bool {
        let level = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        };
        match level {
            Ok(pressed) => pressed,
            Err(_) => {
                crate::log_warn!("button read failed, treating as released");
                false
            }
        }
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}
