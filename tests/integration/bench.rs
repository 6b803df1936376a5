//! Test bench: a pipeline on the default board config wired to the host
//! simulation, with helpers that play the role of the edge hardware.

#![allow(dead_code)]

use homesense::adapters::sim::{SimGpio, SimInterrupts};
use homesense::app::consumer::EventConsumer;
use homesense::app::pipeline::Pipeline;
use homesense::app::reset::ResetLoop;
use homesense::config::SystemConfig;
use homesense::drivers::hal_pins::BoardPin;
use homesense::events::Offer;
use homesense::pins::{Level, PinId};

pub type Consumer<'g> = EventConsumer<&'g SimGpio, BoardPin<&'g SimGpio>>;
pub type Reset<'g> = ResetLoop<BoardPin<&'g SimGpio>>;

/// Default board pipeline with room for `N` events.
pub fn pipeline<const N: usize>(config: SystemConfig) -> Pipeline<N> {
    Pipeline::new(config).expect("valid config")
}

/// Configure sim pins and attach the pipeline's edge handlers.  The call
/// log starts empty, so the startup actuator write is not in it.
pub fn install<const N: usize>(pipeline: &Pipeline<N>) -> (SimGpio, SimInterrupts<'_, N>) {
    let mut gpio = SimGpio::new();
    let mut irq = SimInterrupts::new();
    pipeline.install(&mut gpio, &mut irq).expect("install");
    gpio.clear_calls();
    (gpio, irq)
}

/// Pull `pin` to `level` and raise its interrupt.
pub fn edge<const N: usize>(gpio: &SimGpio, irq: &SimInterrupts<'_, N>, pin: PinId, level: Level) -> Offer {
    gpio.drive(pin, level);
    irq.fire(pin).expect("pin has an interrupt handler")
}

pub fn consumer<'g, const N: usize>(pipeline: &Pipeline<N>, gpio: &'g SimGpio) -> Consumer<'g> {
    pipeline.consumer(gpio, BoardPin::new(gpio, pipeline.config().actuator))
}

pub fn reset<'g, const N: usize>(pipeline: &Pipeline<N>, gpio: &'g SimGpio) -> Reset<'g> {
    pipeline.reset_loop(BoardPin::new(gpio, pipeline.config().actuator))
}

/// Drain the channel through the consumer, returning the pins handled.
pub fn drain<const N: usize>(pipeline: &Pipeline<N>, consumer: &mut Consumer<'_>) -> Vec<PinId> {
    let mut seen = Vec::new();
    while let Some(pin) = pipeline.channel().try_take() {
        seen.push(consumer.handle(pin).pin);
    }
    seen
}
