//! Board-level implementations of the platform seams.
//!
//! [`codec`] builds everywhere so its state handling is unit tested on the
//! host; [`sdcard`] needs the `hardware` feature (embedded-sdmmc, SPI).

pub mod codec;

#[cfg(feature = "hardware")]
pub mod sdcard;

pub use codec::{CodecPlayer, EngineState};

#[cfg(feature = "hardware")]
pub use sdcard::{SdCardVolume, SdCardVolumeError};

/// SPI clock for the SD card. The SPI-mode handshake requires at most
/// 400 kHz and the reader moves only a few hundred bytes.
pub const SD_SPI_HZ: u32 = 400_000;
