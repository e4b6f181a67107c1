#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Keep in sync with `platform::config::{AUDIO_FILE_SIZE, AUDIO_START_OFFSET, AUDIO_SAMPLE_RATE_HZ}`.
const AUDIO_FILE_SIZE: u32 = 990_000;
const AUDIO_START_OFFSET: u32 = 58;
const SAMPLE_RATE_HZ: u32 = 48_000;
const TONE_HZ: f64 = 440.0;
const AMPLITUDE: f64 = 8_000.0;

fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());

    write_audio_table(&out.join("audio_sample.bin"));

    // Only run linker script setup for hardware builds
    #[cfg(feature = "hardware")]
    {
        // Put `memory.x` in our output directory and ensure it's on the linker search path.
        let memory_x = include_bytes!("../../memory.x");
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(memory_x)
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}

/// RIFF/WAVE header padded with a JUNK chunk to `AUDIO_START_OFFSET` bytes,
/// then a 16-bit stereo tone filling the table to `AUDIO_FILE_SIZE`.
fn write_audio_table(path: &Path) {
    let data_len = AUDIO_FILE_SIZE - AUDIO_START_OFFSET;
    let channels: u16 = 2;
    let bits: u16 = 16;
    let block_align = channels * bits / 8;
    let byte_rate = SAMPLE_RATE_HZ * u32::from(block_align);

    let mut w = BufWriter::new(File::create(path).unwrap());
    let mut header = Vec::with_capacity(AUDIO_START_OFFSET as usize);
    header.extend_from_slice(b"RIFF");
    header.extend_from_slice(&(AUDIO_FILE_SIZE - 8).to_le_bytes());
    header.extend_from_slice(b"WAVE");
    header.extend_from_slice(b"fmt ");
    header.extend_from_slice(&16u32.to_le_bytes());
    header.extend_from_slice(&1u16.to_le_bytes()); // PCM
    header.extend_from_slice(&channels.to_le_bytes());
    header.extend_from_slice(&SAMPLE_RATE_HZ.to_le_bytes());
    header.extend_from_slice(&byte_rate.to_le_bytes());
    header.extend_from_slice(&block_align.to_le_bytes());
    header.extend_from_slice(&bits.to_le_bytes());
    let junk = AUDIO_START_OFFSET as usize - header.len() - 8 - 8;
    header.extend_from_slice(b"JUNK");
    header.extend_from_slice(&(junk as u32).to_le_bytes());
    header.resize(header.len() + junk, 0);
    header.extend_from_slice(b"data");
    header.extend_from_slice(&data_len.to_le_bytes());
    assert_eq!(header.len(), AUDIO_START_OFFSET as usize);
    w.write_all(&header).unwrap();

    let frames = data_len / u32::from(block_align);
    for n in 0..frames {
        let t = f64::from(n) / f64::from(SAMPLE_RATE_HZ);
        let sample = (AMPLITUDE * (2.0 * std::f64::consts::PI * TONE_HZ * t).sin()) as i16;
        let bytes = sample.to_le_bytes();
        w.write_all(&bytes).unwrap();
        w.write_all(&bytes).unwrap();
    }
    // Odd tail that does not fill a whole frame.
    let tail = data_len % u32::from(block_align);
    w.write_all(&vec![0u8; tail as usize]).unwrap();
    w.flush().unwrap();
}
