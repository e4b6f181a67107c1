//! Discovery Signals firmware
//!
//! Button-driven LED and audio control plus an SD card text reader for the
//! STM32F407 Discovery board.
//!
//! # Architecture
//!
//! ```text
//!                      ┌──────────── LED queue (10) ───────────▶ LedController ──▶ LED3
//! user button ─▶ ButtonMonitor
//!                      └─────────── audio queue (10) ──────────▶ AudioController ─▶ codec, LED6
//!
//! SD card ─▶ StorageReader ─▶ log, LED4, LED5     (independent of the queues)
//! ```
//!
//! Tasks own their state; the two queues are the only thing they share.
//!
//! # Features
//!
//! - `hardware` - Build for the STM32F407VG target (embassy, defmt, embedded-sdmmc)
//! - `emulator` - Build for desktop simulation (tokio, tracing)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example host_simulation --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)]

pub mod audio_table;
pub mod boot;
#[cfg(feature = "hardware")]
pub mod exception_handlers;
pub mod hardware;
pub mod signal;
pub mod tasks;

#[cfg(feature = "emulator")]
pub mod sim;

// Re-export key types
pub use boot::{QueueAllocator, SignalQueues, StartupError, StaticQueues};
pub use signal::{Signal, SignalChannel, SignalReceiver, SignalSender, QUEUE_CAPACITY};
pub use tasks::{
    AudioController, ButtonMonitor, LedController, LedMode, ReaderPhase, ReaderStats, Route,
    StorageReader,
};
