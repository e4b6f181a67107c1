//! Platform seams for the Discovery signals firmware
//!
//! This crate holds the hardware-facing abstractions the signaling tasks are
//! written against, so the tasks run unchanged on the STM32F407 Discovery
//! board and on a desktop host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: tasks, queues, boot)
//!         ↓
//! Feature Layer (playback crate: pause/resume state, audio payload)
//!         ↓
//! Platform (this crate - trait abstractions, board constants)
//!         ↓
//! Hardware Layer (Embassy HAL + embedded-sdmmc)
//! ```
//!
//! # Seams
//!
//! - [`gpio`] - status LEDs and the user button over embedded-hal 1.0 pins
//! - [`AudioPlayer`] - opaque playback engine (codec, I2S, DMA)
//! - [`Volume`] - mountable FAT volume read line by line
//! - [`config`] - timing constants and board assignments
//!
//! # Features
//!
//! - `std`: `LocalVolume` and the mock peripherals (host tests, emulator)
//! - `hardware`: physical hardware build marker
//! - `defmt`: `defmt::Format` derives and defmt log output
//! - `tracing`: route the log macros to `tracing`
//!
//! # Example
//!
//! ```no_run
//! use platform::{Led, LedId};
//! use embedded_hal::digital::StatefulOutputPin;
//!
//! fn blink<P: StatefulOutputPin>(led: &mut Led<P>) {
//!     led.toggle();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // pin names (PD13, PA0) in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod config;
pub mod gpio;
pub mod log;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use audio::{AudioPlayer, PauseResume};
pub use gpio::{ActiveLevel, Led, LedId, UserButton};
pub use storage::{Line, LineRead, StorageError, Volume, VolumeId, LINE_CAPACITY};
