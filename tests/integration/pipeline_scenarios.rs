//! Interrupt → channel → consumer → actuator, single-threaded.
//!
//! The sim dispatcher plays the hardware: `bench::edge` sets the pin level
//! and raises its interrupt, then the test drains the channel through the
//! consumer exactly as the consumer task would.

use homesense::adapters::sim::GpioCall;
use homesense::config::SystemConfig;
use homesense::events::{EVENT_QUEUE_CAP, Offer, OverflowPolicy};
use homesense::pins::{BUZZER_GPIO, IR_1_GPIO, IR_2_GPIO, Level, VIBRATE_GPIO};

use super::bench;

#[test]
fn single_falling_edge_activates_buzzer_once() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    assert_eq!(bench::edge(&gpio, &irq, IR_1_GPIO, Level::Low), Offer::Queued);
    assert_eq!(pipeline.channel().len(), 1);

    assert_eq!(bench::drain(&pipeline, &mut consumer), vec![IR_1_GPIO]);
    assert_eq!(
        gpio.calls(),
        vec![GpioCall::Read(IR_1_GPIO), GpioCall::Write(BUZZER_GPIO, Level::High)]
    );
    assert_eq!(gpio.level(BUZZER_GPIO), Level::High);
}

#[test]
fn two_sensors_handled_in_fire_order() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    bench::edge(&gpio, &irq, IR_1_GPIO, Level::Low);
    bench::edge(&gpio, &irq, VIBRATE_GPIO, Level::Low);

    assert_eq!(bench::drain(&pipeline, &mut consumer), vec![IR_1_GPIO, VIBRATE_GPIO]);
    assert_eq!(gpio.reads(), vec![IR_1_GPIO, VIBRATE_GPIO]);
}

#[test]
fn burst_up_to_capacity_is_delivered_whole() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    let fired: Vec<_> = [IR_1_GPIO, IR_2_GPIO, VIBRATE_GPIO]
        .into_iter()
        .cycle()
        .take(EVENT_QUEUE_CAP)
        .collect();
    for &pin in &fired {
        assert_eq!(bench::edge(&gpio, &irq, pin, Level::Low), Offer::Queued);
    }

    assert_eq!(bench::drain(&pipeline, &mut consumer), fired);
    assert_eq!(pipeline.channel().dropped(), 0);
    assert_eq!(consumer.handled() as usize, EVENT_QUEUE_CAP);
}

#[test]
fn flood_past_capacity_drops_newest() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    let fired: Vec<_> = [IR_1_GPIO, IR_2_GPIO].into_iter().cycle().take(EVENT_QUEUE_CAP + 5).collect();
    let outcomes: Vec<_> = fired
        .iter()
        .map(|&pin| bench::edge(&gpio, &irq, pin, Level::Low))
        .collect();

    assert!(outcomes[..EVENT_QUEUE_CAP].iter().all(|o| *o == Offer::Queued));
    assert!(outcomes[EVENT_QUEUE_CAP..].iter().all(|o| *o == Offer::Dropped));
    assert_eq!(pipeline.channel().dropped(), 5);

    // Consumer sees exactly the first `capacity` events, in order.
    assert_eq!(bench::drain(&pipeline, &mut consumer), fired[..EVENT_QUEUE_CAP].to_vec());
}

#[test]
fn flood_with_overwrite_keeps_newest() {
    let config = SystemConfig {
        overflow: OverflowPolicy::OverwriteOldest,
        ..SystemConfig::default()
    };
    let pipeline = bench::pipeline::<4>(config);
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    let fired = [IR_1_GPIO, IR_2_GPIO, VIBRATE_GPIO, IR_1_GPIO, IR_2_GPIO, VIBRATE_GPIO];
    for &pin in &fired {
        bench::edge(&gpio, &irq, pin, Level::Low);
    }

    assert_eq!(pipeline.channel().dropped(), 2);
    assert_eq!(bench::drain(&pipeline, &mut consumer), fired[2..].to_vec());
}

#[test]
fn event_after_reset_tick_stays_active_until_next_tick() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);
    let mut reset = bench::reset(&pipeline, &gpio);

    reset.tick();
    assert_eq!(gpio.level(BUZZER_GPIO), Level::Low);

    bench::edge(&gpio, &irq, IR_2_GPIO, Level::Low);
    bench::drain(&pipeline, &mut consumer);
    assert_eq!(gpio.level(BUZZER_GPIO), Level::High);

    reset.tick();
    assert_eq!(gpio.level(BUZZER_GPIO), Level::Low);
    assert_eq!(gpio.writes_to(BUZZER_GPIO), vec![Level::Low, Level::High, Level::Low]);
}

#[test]
fn reset_and_consumer_race_is_last_writer_wins() {
    // Both orders are legal on hardware; the pin shows whichever write
    // landed last.  Neither task coordinates with the other.
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);
    let mut reset = bench::reset(&pipeline, &gpio);

    bench::edge(&gpio, &irq, IR_1_GPIO, Level::Low);
    bench::drain(&pipeline, &mut consumer);
    reset.tick();
    assert_eq!(gpio.level(BUZZER_GPIO), Level::Low, "tick after event cancels the pulse");

    reset.tick();
    bench::edge(&gpio, &irq, IR_1_GPIO, Level::High);
    bench::drain(&pipeline, &mut consumer);
    assert_eq!(gpio.level(BUZZER_GPIO), Level::High, "event after tick holds until the next tick");
}

#[test]
fn consumer_ignores_read_level() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (gpio, irq) = bench::install(&pipeline);
    let mut consumer = bench::consumer(&pipeline, &gpio);

    bench::edge(&gpio, &irq, VIBRATE_GPIO, Level::High);
    let level_read = {
        let pin = pipeline.channel().try_take().unwrap();
        consumer.handle(pin).level
    };

    assert_eq!(level_read, Level::High);
    assert_eq!(gpio.writes_to(BUZZER_GPIO), vec![Level::High]);
}

#[test]
fn outputs_have_no_interrupt() {
    let pipeline = bench::pipeline::<EVENT_QUEUE_CAP>(SystemConfig::default());
    let (_gpio, irq) = bench::install(&pipeline);

    assert_eq!(irq.fire(BUZZER_GPIO), None);
    assert!(pipeline.channel().is_empty());
}
