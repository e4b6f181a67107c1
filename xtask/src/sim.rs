use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

pub fn run(seconds: u64, log: &str) -> Result<()> {
    println!();
    println!("{}", "🖥  Starting host simulation...".cyan().bold());
    println!(
        "   {}",
        format!("{seconds}s run, RUST_LOG={log}").dimmed()
    );
    println!();

    let status = Command::new("cargo")
        .args(["run", "-p", "firmware", "--example", "host_simulation", "--features", "emulator"])
        .env("SIM_SECONDS", seconds.to_string())
        .env("RUST_LOG", log)
        .status()
        .context("Failed to run the host simulation")?;

    if !status.success() {
        anyhow::bail!("Host simulation exited with {status}");
    }

    println!();
    println!("{}", "✓ Simulation finished".green().bold());
    Ok(())
}
