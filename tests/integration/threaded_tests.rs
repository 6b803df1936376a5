//! Consumer task and reset loop on real threads.
//!
//! Mirrors the board topology: edges are raised from the test thread
//! (standing in for interrupt context), and the consumer and the reset loop
//! each run on their own spawned task.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use homesense::adapters::sim::{SimGpio, SimInterrupts};
use homesense::app::pipeline::Pipeline;
use homesense::config::SystemConfig;
use homesense::drivers::hal_pins::BoardPin;
use homesense::events::{EVENT_QUEUE_CAP, Offer};
use homesense::pins::{BUZZER_GPIO, IR_1_GPIO, IR_2_GPIO, Level};

fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

fn static_pipeline(reset_interval_ms: u32) -> (&'static Pipeline, Arc<SimGpio>, SimInterrupts<'static, EVENT_QUEUE_CAP>) {
    let config = SystemConfig {
        reset_interval_ms,
        consumer_stack_kb: 64,
        reset_stack_kb: 64,
        ..SystemConfig::default()
    };
    let pipeline: &'static Pipeline = Pipeline::new(config).expect("valid config").into_static();
    let mut gpio = SimGpio::new();
    let mut irq = SimInterrupts::new();
    pipeline.install(&mut gpio, &mut irq).expect("install");
    gpio.clear_calls();
    (pipeline, Arc::new(gpio), irq)
}

#[test]
fn spawned_consumer_reacts_to_edge() {
    let (pipeline, gpio, irq) = static_pipeline(1000);
    gpio.drive(BUZZER_GPIO, Level::Low);
    gpio.clear_calls();

    let _task = pipeline
        .spawn_consumer(Arc::clone(&gpio), BoardPin::new(Arc::clone(&gpio), BUZZER_GPIO))
        .expect("spawn consumer");

    gpio.drive(IR_1_GPIO, Level::Low);
    assert_eq!(irq.fire(IR_1_GPIO), Some(Offer::Queued));

    wait_for("buzzer high", || gpio.level(BUZZER_GPIO) == Level::High);
    wait_for("channel drained", || pipeline.channel().is_empty());
    assert_eq!(gpio.reads(), vec![IR_1_GPIO]);
}

#[test]
fn consumer_parks_while_idle() {
    let (pipeline, gpio, irq) = static_pipeline(1000);
    gpio.clear_calls();

    let _task = pipeline
        .spawn_consumer(Arc::clone(&gpio), BoardPin::new(Arc::clone(&gpio), BUZZER_GPIO))
        .expect("spawn consumer");

    thread::sleep(Duration::from_millis(50));
    assert!(gpio.calls().is_empty(), "idle consumer must not touch GPIO");

    irq.fire(IR_2_GPIO);
    irq.fire(IR_1_GPIO);
    wait_for("both events handled", || gpio.reads().len() == 2);
    assert_eq!(gpio.reads(), vec![IR_2_GPIO, IR_1_GPIO]);
}

#[test]
fn reset_thread_clears_pulse() {
    let (pipeline, gpio, irq) = static_pipeline(20);

    let _task = pipeline
        .spawn_consumer(Arc::clone(&gpio), BoardPin::new(Arc::clone(&gpio), BUZZER_GPIO))
        .expect("spawn consumer");
    let _reset = pipeline
        .spawn_reset_loop(BoardPin::new(Arc::clone(&gpio), BUZZER_GPIO))
        .expect("spawn reset loop");

    wait_for("first reset", || gpio.writes_to(BUZZER_GPIO).contains(&Level::Low));

    irq.fire(IR_1_GPIO);
    wait_for("pulse on", || gpio.writes_to(BUZZER_GPIO).contains(&Level::High));
    wait_for("pulse off", || {
        let writes = gpio.writes_to(BUZZER_GPIO);
        writes
            .iter()
            .rposition(|l| *l == Level::High)
            .is_some_and(|on| writes[on..].contains(&Level::Low))
    });
    assert_eq!(gpio.level(BUZZER_GPIO), Level::Low);
}
