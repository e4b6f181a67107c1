// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod flash;
mod sim;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Target triple of the STM32F407VG (Cortex-M4F).
pub const TARGET: &str = "thumbv7em-none-eabihf";

/// probe-rs chip name of the Discovery board's MCU.
pub const CHIP: &str = "STM32F407VGTx";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Discovery Signals development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and flash firmware to the Discovery board via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Run the host simulation (scripted button, mock LEDs, local SD card)
    Sim {
        /// Seconds to run before exiting
        #[arg(long, default_value_t = 15)]
        seconds: u64,
        /// Log filter passed as RUST_LOG
        #[arg(long, default_value = "info")]
        log: String,
    },
    /// Check firmware builds for both hardware and emulator targets
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Sim { seconds, log } => sim::run(seconds, &log),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open } => doc::run(open),
    }
}
