//! `embedded-hal` view of a single board pin.
//!
//! [`BoardPin`] pairs a shared GPIO driver with one [`PinId`] and implements
//! the `embedded-hal` 1.0 digital traits on top of the level ports.  The
//! consumer task and the reset loop each hold their own `BoardPin` for the
//! actuator; both handles write the same register, which is the intended
//! last-writer-wins behaviour.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState, StatefulOutputPin};

use crate::app::ports::{LevelReader, LevelWriter};
use crate::pins::{Level, PinId};

/// One pin of a shared GPIO driver `G` (usually `&EspGpio` or `Arc<SimGpio>`).
#[derive(Debug, Clone)]
pub struct BoardPin<G> {
    gpio: G,
    pin: PinId,
}

impl<G> BoardPin<G> {
    pub const fn new(gpio: G, pin: PinId) -> Self {
        Self { gpio, pin }
    }

    pub const fn pin(&self) -> PinId {
        self.pin
    }
}

impl<G> ErrorType for BoardPin<G> {
    type Error = Infallible;
}

impl<G: LevelReader> InputPin for BoardPin<G> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.gpio.get_level(self.pin).is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.gpio.get_level(self.pin).is_high())
    }
}

impl<G: LevelWriter> OutputPin for BoardPin<G> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_level(self.pin, Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_level(self.pin, Level::High);
        Ok(())
    }
}

/// Reads back the output latch through the input path, which the ESP32 GPIO
/// matrix allows for pins configured as outputs.
impl<G: LevelReader + LevelWriter> StatefulOutputPin for BoardPin<G> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.is_high()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_low()
    }
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        PinState::from(level.is_high())
    }
}
