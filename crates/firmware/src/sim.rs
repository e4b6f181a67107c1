//! Host-side runtime glue for the emulator build.
//!
//! The tasks only need a [`DelayNs`]; on the desktop that is a tokio timer.

use embedded_hal_async::delay::DelayNs;
use tracing_subscriber::EnvFilter;

/// [`DelayNs`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl DelayNs for TokioDelay {
    async fn delay_ns(&mut self, ns: u32) {
        tokio::time::sleep(core::time::Duration::from_nanos(u64::from(ns))).await;
    }

    async fn delay_us(&mut self, us: u32) {
        tokio::time::sleep(core::time::Duration::from_micros(u64::from(us))).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        tokio::time::sleep(core::time::Duration::from_millis(u64::from(ms))).await;
    }
}

/// Install the `tracing` subscriber. Filter with `RUST_LOG`
/// (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (e.g. from a test) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
