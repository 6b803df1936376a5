//! Actuator reset loop.
//!
//! Once per interval, drives the actuator back to its inactive level.  Paired
//! with the consumer this gives a self-resetting pulse: an event switches the
//! buzzer on, the next tick switches it off.
//!
//! The loop and the consumer write the same pin with no ordering between
//! them.  The last write before an observer looks wins, so an event landing
//! just before a tick can produce an almost-zero-length pulse.  This is the
//! accepted behaviour of the board, not something to paper over.

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use log::{debug, info, warn};

use crate::pins::Level;

pub struct ResetLoop<A> {
    actuator: A,
    inactive: Level,
    interval: Duration,
    ticks: u32,
}

impl<A: OutputPin> ResetLoop<A> {
    pub fn new(actuator: A, inactive: Level, interval: Duration) -> Self {
        Self {
            actuator,
            inactive,
            interval,
            ticks: 0,
        }
    }

    /// One reset: actuator to the inactive level.
    pub fn tick(&mut self) {
        if let Err(e) = self.actuator.set_state(self.inactive.into()) {
            warn!("reset: actuator write failed: {:?}", e);
        }
        self.ticks = self.ticks.wrapping_add(1);
        debug!("reset: tick {}", self.ticks);
    }

    /// Resets performed since start.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run forever.  Suspends only in the fixed delay between ticks.
    pub fn run(mut self) -> ! {
        info!("reset: every {} ms", self.interval.as_millis());
        loop {
            std::thread::sleep(self.interval);
            self.tick();
        }
    }
}
