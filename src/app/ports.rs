//! Port traits — the boundary between the event pipeline and the platform.
//!
//! ```text
//!   GPIO driver ──▶ Port trait ──▶ EventConsumer / ResetLoop / Pipeline
//! ```
//!
//! The ESP-IDF GPIO driver ([`crate::drivers::hw_init::EspGpio`]) implements
//! all of these on hardware; the host simulation
//! ([`crate::adapters::sim`]) implements them in memory for tests.
//!
//! Level reads and writes take `&self`: on the ESP32 each one is a single
//! register access, so the consumer task and the reset loop can share one
//! driver without a lock.

use std::sync::Arc;

use crate::config::PinConfig;
use crate::drivers::hw_init::HwInitError;
use crate::drivers::isr::EdgeBinding;
use crate::pins::{Level, PinId};

// ───────────────────────────────────────────────────────────────
// Pin read / write (driven adapter: domain ↔ hardware)
// ───────────────────────────────────────────────────────────────

/// Read the instantaneous level of an input.
pub trait LevelReader {
    fn get_level(&self, pin: PinId) -> Level;
}

/// Drive an output.  The write is atomic at the register level.
pub trait LevelWriter {
    fn set_level(&self, pin: PinId, level: Level);
}

impl<T: LevelReader + ?Sized> LevelReader for &T {
    fn get_level(&self, pin: PinId) -> Level {
        (**self).get_level(pin)
    }
}

impl<T: LevelWriter + ?Sized> LevelWriter for &T {
    fn set_level(&self, pin: PinId, level: Level) {
        (**self).set_level(pin, level);
    }
}

impl<T: LevelReader + ?Sized> LevelReader for Arc<T> {
    fn get_level(&self, pin: PinId) -> Level {
        (**self).get_level(pin)
    }
}

impl<T: LevelWriter + ?Sized> LevelWriter for Arc<T> {
    fn set_level(&self, pin: PinId, level: Level) {
        (**self).set_level(pin, level);
    }
}

// ───────────────────────────────────────────────────────────────
// Startup-time platform services
// ───────────────────────────────────────────────────────────────

/// Applies direction, pull and edge-trigger settings to a pin.
pub trait PinConfigurator {
    fn configure(&mut self, cfg: &PinConfig) -> Result<(), HwInitError>;
}

/// Hooks an [`EdgeBinding`] to its pin's interrupt.
///
/// After `attach` returns, every qualifying edge on `binding.pin()` must
/// invoke [`EdgeBinding::on_edge`] from interrupt context.  Bindings are
/// never detached.
pub trait EdgeRegistry<'a, const N: usize> {
    fn attach(&mut self, binding: EdgeBinding<'a, N>) -> Result<(), HwInitError>;
}
