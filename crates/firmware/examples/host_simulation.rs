//! Host simulation of the full firmware
//!
//! Runs the button monitor, LED controller, audio controller and storage
//! reader together on tokio, with mock LEDs and player, a scripted button and
//! a `LocalVolume` whose "card" is inserted a few seconds after start.
//!
//! Run with: cargo run -p firmware --example host_simulation --features emulator
//! Set `SIM_SECONDS` to change the run time and `RUST_LOG=debug` to see every
//! LED write.

use std::time::Duration;

use firmware::boot::{self, StaticQueues};
use firmware::sim::{init_tracing, TokioDelay};
use firmware::tasks::{AudioController, ButtonMonitor, LedController, StorageReader};
use firmware::SignalChannel;
use platform::config;
use platform::mocks::{MockLed, MockPlayer, ScriptedButton};
use platform::storage_local::LocalVolume;
use platform::{Led, LedId, UserButton};
use static_cell::StaticCell;

static LED_QUEUE: StaticCell<SignalChannel> = StaticCell::new();
static AUDIO_QUEUE: StaticCell<SignalChannel> = StaticCell::new();

const PRESSES: usize = 6;
const CARD_INSERT_DELAY: Duration = Duration::from_millis(2_500);
const CARD_LINES: &str = "hello from the SD card\nsecond line\nthird and last line\n";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!("{} v{} - host simulation", config::APP_NAME, config::APP_VERSION);

    let run_for = std::env::var("SIM_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map_or(Duration::from_secs(15), Duration::from_secs);

    let orange = MockLed::named("LED3/orange");
    let green = MockLed::named("LED4/green");
    let red = MockLed::named("LED5/red");
    let blue = MockLed::named("LED6/blue");
    let orange_probe = orange.probe();
    let player = MockPlayer::new();
    let pin = ScriptedButton::new(&[]);
    let button = pin.handle();

    let card_dir = tempfile::tempdir()?;
    let card_root = card_dir.path().join("sdcard");
    let volume = LocalVolume::new(&card_root);

    let payload = firmware::audio_table::payload().map_err(|e| e.as_str())?;

    let mut queues = StaticQueues::new(&LED_QUEUE, &AUDIO_QUEUE);
    let (monitor, led, audio, reader) = boot::start(&mut queues, |q| {
        (
            ButtonMonitor::new(
                UserButton::active_high(pin),
                TokioDelay,
                q.led.sender(),
                q.audio.sender(),
            ),
            LedController::new(Led::new(orange, LedId::Orange), TokioDelay, q.led.receiver()),
            AudioController::new(
                player.clone(),
                Led::new(blue, LedId::Blue),
                TokioDelay,
                q.audio.receiver(),
                payload,
            ),
            StorageReader::new(
                volume,
                Led::new(red, LedId::Red),
                Led::new(green, LedId::Green),
                TokioDelay,
            ),
        )
    })
    .map_err(|e| e.as_str())?;

    let presses = async {
        for n in 1..=PRESSES {
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            tracing::info!("sim: press {}", n);
            button.press();
            tokio::time::sleep(Duration::from_millis(250)).await;
            button.release();
        }
        std::future::pending::<()>().await;
    };

    let insert_card = async {
        tokio::time::sleep(CARD_INSERT_DELAY).await;
        match std::fs::create_dir_all(&card_root)
            .and_then(|()| std::fs::write(card_root.join(config::STORAGE_FILE_PATH), CARD_LINES))
        {
            Ok(()) => tracing::info!("sim: card inserted"),
            Err(e) => tracing::error!("sim: could not create card: {}", e),
        }
        std::future::pending::<()>().await;
    };

    tokio::select! {
        _ = monitor.run() => {}
        _ = led.run() => {}
        _ = audio.run() => {}
        _ = reader.run() => {}
        () = presses => {}
        () = insert_card => {}
        () = tokio::time::sleep(run_for) => {}
    }

    let commands: Vec<&str> = player.commands().iter().map(|c| c.as_str()).collect();
    tracing::info!(
        "sim: done after {:?}; LED3 toggles {}, player commands {:?}",
        run_for,
        orange_probe.toggles(),
        commands
    );
    Ok(())
}
