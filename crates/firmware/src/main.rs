//! Discovery Signals firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32F407VG (Discovery board).
//!
//! # Executors
//!
//! | Executor              | Priority | Tasks                                |
//! |-----------------------|----------|--------------------------------------|
//! | `InterruptExecutor` on UART4 | P6 | LED controller                      |
//! | `InterruptExecutor` on UART5 | P7 | storage reader                      |
//! | thread-mode `Executor` | lowest  | button monitor, audio controller     |
//!
//! UART4/UART5 are unused on this board; their interrupt vectors only drive
//! the executors.

#![no_std]
#![no_main]

use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::{AnyPin, Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::peripherals::SPI1;
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;

use firmware::boot::{self, StaticQueues, BOOT_SEQUENCE_STEPS};
use firmware::hardware::{CodecPlayer, SdCardVolume, SD_SPI_HZ};
use firmware::signal::SignalChannel;
use firmware::tasks::{AudioController, ButtonMonitor, LedController, StorageReader};
use platform::config::{APP_NAME, APP_VERSION};
use platform::{Led, LedId, UserButton};

// Logging transport and panic handler
use {defmt_rtt as _, panic_probe as _};

type OutPin = Output<'static, AnyPin>;
type InPin = Input<'static, AnyPin>;
type SdSpi = ExclusiveDevice<Spi<'static, SPI1, NoDma, NoDma>, OutPin, Delay>;

type LedTask = LedController<'static, OutPin, Delay>;
type StorageTask = StorageReader<SdCardVolume<SdSpi, Delay>, OutPin, Delay>;
type ButtonTask = ButtonMonitor<'static, InPin, Delay>;
type AudioTask = AudioController<'static, CodecPlayer, OutPin, Delay>;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

static LED_QUEUE: StaticCell<SignalChannel> = StaticCell::new();
static AUDIO_QUEUE: StaticCell<SignalChannel> = StaticCell::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt();
}

#[interrupt]
unsafe fn UART5() {
    EXECUTOR_MED.on_interrupt();
}

#[embassy_executor::task]
async fn led_task(task: LedTask) {
    task.run().await
}

#[embassy_executor::task]
async fn storage_task(task: StorageTask) {
    task.run().await
}

#[embassy_executor::task]
async fn button_task(task: ButtonTask) {
    task.run().await
}

#[embassy_executor::task]
async fn audio_task(task: AudioTask) {
    task.run().await
}

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::info!("{=str} v{=str}", APP_NAME, APP_VERSION);
    for step in BOOT_SEQUENCE_STEPS {
        defmt::debug!("boot: {=str}", *step);
    }

    let p = embassy_stm32::init(Default::default());

    let payload = match firmware::audio_table::payload() {
        Ok(payload) => payload,
        Err(e) => {
            defmt::error!("audio table rejected: {=str}", e.as_str());
            boot::halt()
        }
    };

    // Status LEDs (PD12-PD15) and the user button (PA0, external pull-down).
    let orange = Led::new(Output::new(p.PD13, Level::Low, Speed::Low).degrade(), LedId::Orange);
    let green = Led::new(Output::new(p.PD12, Level::Low, Speed::Low).degrade(), LedId::Green);
    let red = Led::new(Output::new(p.PD14, Level::Low, Speed::Low).degrade(), LedId::Red);
    let blue = Led::new(Output::new(p.PD15, Level::Low, Speed::Low).degrade(), LedId::Blue);
    let button = UserButton::active_high(Input::new(p.PA0, Pull::None).degrade());

    // SD card on SPI1: PA5 SCK, PA6 MISO, PA7 MOSI, PB5 CS.
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = Hertz(SD_SPI_HZ);
    let spi = Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config);
    let cs = Output::new(p.PB5, Level::High, Speed::VeryHigh).degrade();
    let Ok(sd_spi) = ExclusiveDevice::new(spi, cs, Delay) else {
        defmt::error!("SD card chip select init failed");
        boot::halt()
    };
    let volume = SdCardVolume::new(sd_spi, Delay);

    let mut queues = StaticQueues::new(&LED_QUEUE, &AUDIO_QUEUE);
    let started = boot::start(&mut queues, |q| {
        interrupt::UART4.set_priority(Priority::P6);
        let high = EXECUTOR_HIGH.start(interrupt::UART4);
        high.must_spawn(led_task(LedController::new(orange, Delay, q.led.receiver())));

        interrupt::UART5.set_priority(Priority::P7);
        let med = EXECUTOR_MED.start(interrupt::UART5);
        med.must_spawn(storage_task(StorageReader::new(volume, red, green, Delay)));

        let monitor = ButtonMonitor::new(button, Delay, q.led.sender(), q.audio.sender());
        let audio = AudioController::new(CodecPlayer::new(), blue, Delay, q.audio.receiver(), payload);
        (monitor, audio)
    });
    let (monitor, audio) = match started {
        Ok(tasks) => tasks,
        Err(e) => {
            defmt::error!("startup failed: {=str}", e.as_str());
            boot::halt()
        }
    };

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(button_task(monitor));
        spawner.must_spawn(audio_task(audio));
    })
}
