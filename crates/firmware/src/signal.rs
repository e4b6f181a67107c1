//! Signal queues between the button monitor and its two consumers.
//!
//! Each queue is a bounded [`Channel`] of [`Signal`] tokens. Producers only
//! ever call [`try_signal`] and consumers only ever call [`poll_signal`], so
//! neither side suspends on a queue: a full queue drops the signal, an empty
//! queue reads as "no signal this tick".
//!
//! The channels use [`CriticalSectionRawMutex`] because producer and
//! consumers run on executors at different interrupt priorities.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

pub use platform::config::QUEUE_CAPACITY;

/// Integer value of the token when it has to be represented as a word.
pub const SIGNAL_TAG: u32 = 1;

/// "Toggle your mode" token. Carries no data beyond its delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signal;

impl Signal {
    /// Wire value of the token.
    pub const fn tag(self) -> u32 {
        SIGNAL_TAG
    }
}

/// Bounded signal queue.
pub type SignalChannel = Channel<CriticalSectionRawMutex, Signal, QUEUE_CAPACITY>;

/// Producer end of a [`SignalChannel`].
pub type SignalSender<'a> = Sender<'a, CriticalSectionRawMutex, Signal, QUEUE_CAPACITY>;

/// Consumer end of a [`SignalChannel`].
pub type SignalReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, Signal, QUEUE_CAPACITY>;

/// Enqueue one signal without waiting.
///
/// Returns `false` if the queue was full and the signal was dropped.
pub fn try_signal(tx: &SignalSender<'_>) -> bool {
    tx.try_send(Signal).is_ok()
}

/// Take one pending signal, if any, without waiting.
pub fn poll_signal(rx: &SignalReceiver<'_>) -> bool {
    rx.try_receive().is_ok() // ok: TryReceiveError::Empty is the only error
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_capacity_is_ten() {
        assert_eq!(QUEUE_CAPACITY, 10);
    }

    #[test]
    fn test_signal_tag_is_one() {
        assert_eq!(Signal.tag(), 1);
    }

    #[test]
    fn test_overflow_drops_excess_signals() {
        let channel = SignalChannel::new();
        let tx = channel.sender();
        let rx = channel.receiver();

        let accepted = (0..15).filter(|_| try_signal(&tx)).count();
        assert_eq!(accepted, QUEUE_CAPACITY);

        let received = core::iter::from_fn(|| poll_signal(&rx).then_some(())).count();
        assert_eq!(received, QUEUE_CAPACITY);
        assert!(!poll_signal(&rx));
    }

    #[test]
    fn test_empty_queue_polls_false() {
        let channel = SignalChannel::new();
        assert!(!poll_signal(&channel.receiver()));
    }
}
