use anyhow::{Context, Result};
use colored::Colorize;
use platform::config::AUDIO_FILE_SIZE;
use std::process::Command;
use std::time::Instant;

use crate::{CHIP, TARGET};

/// STM32F407VG on-chip flash.
const FLASH_BYTES: u64 = 1024 * 1024;

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };
    let binary = format!("target/{TARGET}/{mode}/firmware");

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({mode} mode)...").cyan().bold()
    );
    println!();

    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd.args(["build", "-p", "firmware", "--bin", "firmware", "--target", TARGET, "--features", "hardware"]);
    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Build successful in {:.2}s",
            build_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    check_image_size(&binary)?;
    println!();

    println!("{}", "📡 Flashing to STM32F407 Discovery...".cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["run", &binary, "--chip", CHIP, "--probe-index", "0"])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the device is powered");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP}' to view RTT logs").dimmed()
    );
    println!();

    Ok(())
}

/// Print the flash footprint and refuse images that cannot fit.
///
/// The embedded audio table alone takes most of flash, so debug builds
/// usually fail here.
fn check_image_size(binary: &str) -> Result<()> {
    let output = Command::new("rust-size").args(["-A", binary]).output();
    let Ok(out) = output else {
        println!("{}", "   rust-size not found, skipping size check".dimmed());
        return Ok(());
    };
    if !out.status.success() {
        return Ok(());
    }

    let report = String::from_utf8_lossy(&out.stdout);
    println!("{}", "📊 Binary size:".cyan());
    for line in report.lines() {
        println!("   {}", line.dimmed());
    }

    let flash_used: u64 = report
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let name = cols.next()?;
            let size = cols.next()?.parse::<u64>().ok()?;
            matches!(name, ".vector_table" | ".text" | ".rodata" | ".data").then_some(size)
        })
        .sum();

    println!(
        "   {}",
        format!(
            "flash: {flash_used} of {FLASH_BYTES} bytes ({AUDIO_FILE_SIZE} in the audio table)"
        )
        .dimmed()
    );
    if flash_used > FLASH_BYTES {
        anyhow::bail!("Image does not fit in flash; build with --release");
    }
    Ok(())
}
