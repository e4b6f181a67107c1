//! Boot sequence: create the signal queues, then hand them to the spawner.
//!
//! # Ordering
//!
//! ```text
//! 1. embassy_stm32::init()            clocks, GPIO, SPI (main.rs)
//! 2. create_queues()                  LED queue, audio queue (10 slots each)
//! 3. spawn interrupt-executor tasks   LED controller (P6), storage reader (P7)
//! 4. run thread-mode executor         button monitor, audio controller
//! ```
//!
//! If either queue cannot be created the system halts before step 3, so no
//! task ever runs against a missing queue.

use static_cell::StaticCell;
use thiserror_no_std::Error;

use crate::signal::SignalChannel;
use crate::tasks::Route;

/// Ordered boot steps, as logged at startup.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "init peripherals",
    "create signal queues",
    "spawn interrupt-priority tasks",
    "run thread-mode executor",
];

/// Errors that stop the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// The queue for the given consumer could not be allocated.
    #[error("signal queue unavailable")]
    QueueUnavailable(Route),
}

impl StartupError {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueueUnavailable(Route::Led) => "LED queue unavailable",
            Self::QueueUnavailable(Route::Audio) => "audio queue unavailable",
        }
    }
}

/// Source of queue storage.
pub trait QueueAllocator {
    /// Allocate the queue consumed by `route`, or `None` if no storage is left.
    fn allocate(&mut self, route: Route) -> Option<&'static SignalChannel>;
}

/// Queues backed by two `static` cells. Each cell can be taken once.
pub struct StaticQueues {
    led: &'static StaticCell<SignalChannel>,
    audio: &'static StaticCell<SignalChannel>,
}

impl StaticQueues {
    /// Allocate from `led` and `audio`.
    pub const fn new(
        led: &'static StaticCell<SignalChannel>,
        audio: &'static StaticCell<SignalChannel>,
    ) -> Self {
        Self { led, audio }
    }
}

impl QueueAllocator for StaticQueues {
    fn allocate(&mut self, route: Route) -> Option<&'static SignalChannel> {
        let cell = match route {
            Route::Led => self.led,
            Route::Audio => self.audio,
        };
        cell.try_init(SignalChannel::new()).map(|q| &*q)
    }
}

/// Both signal queues.
#[derive(Clone, Copy)]
pub struct SignalQueues {
    /// Button monitor to LED controller.
    pub led: &'static SignalChannel,
    /// Button monitor to audio controller.
    pub audio: &'static SignalChannel,
}

/// Create the LED and audio queues.
pub fn create_queues<A: QueueAllocator>(alloc: &mut A) -> Result<SignalQueues, StartupError> {
    let led = alloc
        .allocate(Route::Led)
        .ok_or(StartupError::QueueUnavailable(Route::Led))?;
    let audio = alloc
        .allocate(Route::Audio)
        .ok_or(StartupError::QueueUnavailable(Route::Audio))?;
    Ok(SignalQueues { led, audio })
}

/// Create the queues and, only if that succeeded, call `spawn` with them.
pub fn start<A, R>(
    alloc: &mut A,
    spawn: impl FnOnce(SignalQueues) -> R,
) -> Result<R, StartupError>
where
    A: QueueAllocator,
{
    let queues = create_queues(alloc)?;
    platform::log_info!("signal queues ready ({} slots each)", crate::signal::QUEUE_CAPACITY);
    Ok(spawn(queues))
}

/// Stop forever after a fatal startup error.
pub fn halt() -> ! {
    platform::log_error!("halted");
    loop {
        #[cfg(feature = "hardware")]
        cortex_m::asm::wfi();
        #[cfg(not(feature = "hardware"))]
        core::hint::spin_loop();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    /// Allocator that leaks fresh queues, optionally refusing one route.
    struct LeakingQueues {
        refuse: Option<Route>,
        handed_out: usize,
    }

    impl QueueAllocator for LeakingQueues {
        fn allocate(&mut self, route: Route) -> Option<&'static SignalChannel> {
            if self.refuse == Some(route) {
                return None;
            }
            self.handed_out += 1;
            Some(Box::leak(Box::new(SignalChannel::new())))
        }
    }

    #[test]
    fn test_start_spawns_with_both_queues() {
        let mut alloc = LeakingQueues {
            refuse: None,
            handed_out: 0,
        };
        let queues = start(&mut alloc, |q| q).unwrap();
        assert!(!core::ptr::eq(queues.led, queues.audio));
        assert_eq!(alloc.handed_out, 2);
    }

    #[test]
    fn test_queue_failure_never_spawns() {
        for refused in [Route::Led, Route::Audio] {
            let mut alloc = LeakingQueues {
                refuse: Some(refused),
                handed_out: 0,
            };
            let mut spawned = false;
            let err = start(&mut alloc, |_| spawned = true).unwrap_err();
            assert_eq!(err, StartupError::QueueUnavailable(refused));
            assert!(!spawned, "no task may be created after a queue failure");
        }
    }

    #[test]
    fn test_static_queues_hand_out_once() {
        static LED: StaticCell<SignalChannel> = StaticCell::new();
        static AUDIO: StaticCell<SignalChannel> = StaticCell::new();

        let mut alloc = StaticQueues::new(&LED, &AUDIO);
        assert!(create_queues(&mut alloc).is_ok());
        assert_eq!(
            create_queues(&mut alloc).err(),
            Some(StartupError::QueueUnavailable(Route::Led))
        );
    }

    #[test]
    fn test_error_names() {
        assert_eq!(
            StartupError::QueueUnavailable(Route::Audio).as_str(),
            "audio queue unavailable"
        );
    }

    #[test]
    fn test_boot_sequence_creates_queues_before_spawning() {
        let queues = BOOT_SEQUENCE_STEPS
            .iter()
            .position(|s| s.contains("queues"))
            .unwrap();
        let spawn = BOOT_SEQUENCE_STEPS
            .iter()
            .position(|s| s.contains("spawn"))
            .unwrap();
        assert!(queues < spawn);
    }
}
