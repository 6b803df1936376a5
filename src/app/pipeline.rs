//! Pipeline context: the one place the event channel lives.
//!
//! ```text
//!              install()                       spawn_consumer()
//!  PinConfigurator ◀── Pipeline ──▶ EdgeRegistry      │
//!                        │  owns                      ▼
//!                        └── EventChannel<N> ◀── EventConsumer (task)
//!                                 ▲
//!                      EdgeBinding::on_edge (ISR)
//! ```
//!
//! There is no global channel.  `main()` builds a `Pipeline`, promotes it to
//! `'static` with [`Pipeline::into_static`], and hands references to the
//! interrupt registry and the consumer task explicitly.  Tests can keep a
//! pipeline on the stack and attach bindings with a shorter lifetime.

use core::time::Duration;
use std::io;
use std::thread::JoinHandle;

use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::consumer::EventConsumer;
use crate::app::ports::{EdgeRegistry, LevelReader, LevelWriter, PinConfigurator};
use crate::app::reset::ResetLoop;
use crate::config::SystemConfig;
use crate::drivers::isr::EdgeBinding;
use crate::drivers::task_pin::{block_on, spawn_on_core};
use crate::error::Result;
use crate::events::{EVENT_QUEUE_CAP, EventChannel};

pub struct Pipeline<const N: usize = EVENT_QUEUE_CAP> {
    config: SystemConfig,
    channel: EventChannel<N>,
}

impl<const N: usize> Pipeline<N> {
    /// Validate `config` and create the channel.  Nothing touches hardware yet.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            channel: EventChannel::new(config.overflow),
            config,
        })
    }

    /// Leak into a process-lifetime reference for ISR registration.
    pub fn into_static(self) -> &'static Self {
        Box::leak(Box::new(self))
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn channel(&self) -> &EventChannel<N> {
        &self.channel
    }

    /// Configure every pin, switch the actuator off, then attach one
    /// interrupt binding per edge-triggered input.  Any failure is fatal to
    /// startup.
    ///
    /// Returns the number of bindings attached.
    pub fn install<'a, C, R>(&'a self, gpio: &mut C, irq: &mut R) -> Result<usize>
    where
        C: PinConfigurator + LevelWriter,
        R: EdgeRegistry<'a, N>,
    {
        for cfg in &self.config.pins {
            gpio.configure(cfg)?;
        }
        // Off before any edge can reach the consumer, whatever the polarity.
        gpio.set_level(self.config.actuator, self.config.actuator_inactive());

        let mut attached = 0;
        for cfg in self.config.edge_inputs() {
            irq.attach(EdgeBinding::new(cfg.pin, &self.channel))?;
            attached += 1;
        }

        info!(
            "pipeline: {} pins configured, {} edge handlers attached, actuator {}",
            self.config.pins.len(),
            attached,
            self.config.actuator
        );
        Ok(attached)
    }

    /// Consumer wired to this pipeline's actuator level.
    pub fn consumer<R, A>(&self, reader: R, actuator: A) -> EventConsumer<R, A>
    where
        R: LevelReader,
        A: OutputPin,
    {
        EventConsumer::new(reader, actuator, self.config.actuator_active)
    }

    /// Reset loop wired to this pipeline's actuator level and interval.
    pub fn reset_loop<A: OutputPin>(&self, actuator: A) -> ResetLoop<A> {
        ResetLoop::new(
            actuator,
            self.config.actuator_inactive(),
            Duration::from_millis(u64::from(self.config.reset_interval_ms)),
        )
    }

    /// Start the consumer on its own task with the configured core,
    /// priority and stack.
    pub fn spawn_consumer<R, A>(&'static self, reader: R, actuator: A) -> io::Result<JoinHandle<()>>
    where
        R: LevelReader + Send + 'static,
        A: OutputPin + Send + 'static,
    {
        let mut consumer = self.consumer(reader, actuator);
        let channel = &self.channel;
        spawn_on_core(
            self.config.consumer_core,
            self.config.consumer_priority,
            self.config.consumer_stack_kb,
            "edge-consumer\0",
            move || match block_on(consumer.run(channel)) {},
        )
    }

    /// Start the reset loop on its own task with the configured core,
    /// priority and stack.  The task never exits.
    pub fn spawn_reset_loop<A>(&self, actuator: A) -> io::Result<JoinHandle<()>>
    where
        A: OutputPin + Send + 'static,
    {
        let reset = self.reset_loop(actuator);
        spawn_on_core(
            self.config.reset_core,
            self.config.reset_priority,
            self.config.reset_stack_kb,
            "actuator-reset\0",
            move || {
                reset.run();
            },
        )
    }
}
