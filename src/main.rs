//! HomeSense Firmware — Main Entry Point
//!
//! ```text
//!  IR_1 / IR_2 / VIBRATE ──edge──▶ EdgeBinding::on_edge (ISR)
//!                                        │ offer(PinId)
//!                                        ▼
//!                              Pipeline::channel (EventChannel)
//!                                        │ take().await
//!                                        ▼
//!                     edge-consumer task (core 1): BUZZER ← HIGH
//!                     actuator-reset task (core 0), every 1 s: BUZZER ← LOW
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use homesense::app::pipeline::Pipeline;
use homesense::config::SystemConfig;
use homesense::drivers::hal_pins::BoardPin;
use homesense::drivers::hw_init::EspGpio;
use homesense::drivers::isr::EspEdgeRegistry;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HomeSense v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Pipeline context (validated config + event channel) ─
    let pipeline: &'static Pipeline = Pipeline::new(SystemConfig::default())?.into_static();
    let actuator = pipeline.config().actuator;

    // ── 3. GPIO + ISR service ─────────────────────────────────
    // Any failure here is a wiring/config bug; let it abort the boot.
    let mut gpio = EspGpio::take();
    let mut irq = EspEdgeRegistry::install()?;

    // ── 4. Consumer task before interrupts, so early edges are queued ──
    let _consumer = pipeline.spawn_consumer(gpio, BoardPin::new(gpio, actuator))?;
    pipeline.install(&mut gpio, &mut irq)?;

    // ── 5. Reset loop on its own task ─────────────────────────
    let reset = pipeline.spawn_reset_loop(BoardPin::new(gpio, actuator))?;

    info!("System ready.");

    // Neither task returns; the main task just parks here.
    let _ = reset.join();
    anyhow::bail!("reset task exited")
}
