//! Event consumer task.
//!
//! Takes pin events off the channel one at a time, reads the reporting
//! pin's live level, and switches the actuator on.
//!
//! The reaction is the same for every monitored pin and every level read:
//! any qualifying edge turns the buzzer on.  The level is read and logged
//! but does not select the command.  Whether sensors should eventually get
//! differentiated reactions is an open product question; until then this
//! stays literal.
//!
//! Because the consumer re-reads the pin instead of trusting a queued edge
//! direction, an event lost to channel overflow only delays a reaction
//! until the next event arrives.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::LevelReader;
use crate::events::EventChannel;
use crate::pins::{Level, PinId};

/// What one loop iteration observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    /// Pin that raised the event.
    pub pin: PinId,
    /// Its level when the consumer read it.
    pub level: Level,
}

pub struct EventConsumer<R, A> {
    reader: R,
    actuator: A,
    active: Level,
    handled: u32,
    seen_drops: u32,
}

impl<R: LevelReader, A: OutputPin> EventConsumer<R, A> {
    pub fn new(reader: R, actuator: A, active: Level) -> Self {
        Self {
            reader,
            actuator,
            active,
            handled: 0,
            seen_drops: 0,
        }
    }

    /// One loop iteration for an already-received event.
    pub fn handle(&mut self, pin: PinId) -> Reaction {
        let level = self.reader.get_level(pin);
        info!("GPIO[{}] intr, val: {}", pin.num(), u8::from(level));

        if let Err(e) = self.actuator.set_state(self.active.into()) {
            warn!("consumer: actuator write failed: {:?}", e);
        }

        self.handled = self.handled.wrapping_add(1);
        Reaction { pin, level }
    }

    /// Events handled since start.
    pub fn handled(&self) -> u32 {
        self.handled
    }

    /// Channel drop count as of the last overflow report.
    pub fn dropped_seen(&self) -> u32 {
        self.seen_drops
    }

    /// Run forever.  Suspends only inside [`EventChannel::take`].
    pub async fn run<const N: usize>(&mut self, channel: &EventChannel<N>) -> Infallible {
        info!("consumer: waiting for events (capacity={}, policy={:?})", N, channel.policy());
        loop {
            let pin = channel.take().await;
            self.report_drops(channel.dropped());
            self.handle(pin);
        }
    }

    // The interrupt side cannot log; surface overflow here instead.
    // Returns the number of newly reported losses.
    fn report_drops(&mut self, total: u32) -> u32 {
        let lost = total.wrapping_sub(self.seen_drops);
        if lost != 0 {
            warn!("consumer: event channel overflowed, {} event(s) lost ({} total)", lost, total);
            self.seen_drops = total;
        }
        lost
    }
}
