//! The four firmware tasks.
//!
//! Each task is a plain struct generic over its platform seams with a
//! single-iteration method (`poll`, `tick`/`step`) and a `run` loop that never
//! returns. The hardware binary wraps `run` in an `#[embassy_executor::task]`;
//! tests drive the single-iteration methods directly.
//!
//! | Task              | Queue      | Period            | Executor priority |
//! |-------------------|------------|-------------------|-------------------|
//! | [`ButtonMonitor`] | producer   | 10 ms idle / 100 ms held | thread mode |
//! | [`LedController`] | LED queue  | 500 ms            | interrupt P6      |
//! | [`AudioController`] | audio queue | 200 ms         | thread mode       |
//! | [`StorageReader`] | -          | per phase         | interrupt P7      |

pub mod audio;
pub mod button;
pub mod led;
pub mod storage;

pub use audio::AudioController;
pub use button::{ButtonMonitor, Dispatch, Route};
pub use led::{LedController, LedMode};
pub use storage::{ReaderPhase, ReaderStats, StorageReader};
