//! Host simulation of the GPIO driver and the interrupt dispatcher.
//!
//! Used by unit and integration tests, and by anyone exercising the pipeline
//! without a board attached.
//!
//! - [`SimGpio`] keeps pin levels in an atomic bitmask and records every
//!   read and write so tests can assert on the exact call sequence.
//! - [`SimInterrupts`] stores the attached [`EdgeBinding`]s and
//!   [`fire`](SimInterrupts::fire)s them the way the hardware dispatcher would.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use heapless::Vec as HVec;

use crate::app::ports::{EdgeRegistry, LevelReader, LevelWriter, PinConfigurator};
use crate::config::{MAX_PINS, PinConfig};
use crate::drivers::hw_init::HwInitError;
use crate::drivers::isr::EdgeBinding;
use crate::events::Offer;
use crate::pins::{Level, PinId};

/// One recorded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    Read(PinId),
    Write(PinId, Level),
}

/// In-memory GPIO driver.
///
/// All pins start HIGH, matching pulled-up inputs at rest.
#[derive(Debug)]
pub struct SimGpio {
    levels: AtomicU64,
    calls: Mutex<Vec<GpioCall>>,
    configured: HVec<PinConfig, MAX_PINS>,
    fail_on: Option<PinId>,
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            levels: AtomicU64::new(u64::MAX),
            calls: Mutex::new(Vec::new()),
            configured: HVec::new(),
            fail_on: None,
        }
    }

    /// Make `configure` reject `pin`, as the platform does for a bad line.
    #[must_use]
    pub fn failing_on(mut self, pin: PinId) -> Self {
        self.fail_on = Some(pin);
        self
    }

    /// Set the external level on a pin without recording a call.
    pub fn drive(&self, pin: PinId, level: Level) {
        match level {
            Level::High => self.levels.fetch_or(pin.mask(), Ordering::SeqCst),
            Level::Low => self.levels.fetch_and(!pin.mask(), Ordering::SeqCst),
        };
    }

    /// Current level without recording a call.
    pub fn level(&self, pin: PinId) -> Level {
        Level::from(self.levels.load(Ordering::SeqCst) & pin.mask() != 0)
    }

    /// Snapshot of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<GpioCall> {
        self.lock_calls().clone()
    }

    /// Recorded writes to `pin`, oldest first.
    pub fn writes_to(&self, pin: PinId) -> Vec<Level> {
        self.lock_calls()
            .iter()
            .filter_map(|c| match *c {
                GpioCall::Write(p, level) if p == pin => Some(level),
                _ => None,
            })
            .collect()
    }

    /// Recorded reads, oldest first.
    pub fn reads(&self) -> Vec<PinId> {
        self.lock_calls()
            .iter()
            .filter_map(|c| match *c {
                GpioCall::Read(p) => Some(p),
                GpioCall::Write(..) => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock_calls().clear();
    }

    /// Pins configured so far, in call order.
    pub fn configured(&self) -> &[PinConfig] {
        &self.configured
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<GpioCall>> {
        // A panicking test thread must not hide the log from the others.
        self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LevelReader for SimGpio {
    fn get_level(&self, pin: PinId) -> Level {
        self.lock_calls().push(GpioCall::Read(pin));
        self.level(pin)
    }
}

impl LevelWriter for SimGpio {
    fn set_level(&self, pin: PinId, level: Level) {
        // Log before the level changes so a concurrent reader of the log
        // never sees a level without its write.
        self.lock_calls().push(GpioCall::Write(pin, level));
        self.drive(pin, level);
    }
}

impl PinConfigurator for SimGpio {
    fn configure(&mut self, cfg: &PinConfig) -> Result<(), HwInitError> {
        if self.fail_on == Some(cfg.pin) {
            return Err(HwInitError::GpioConfigFailed(-1));
        }
        self.configured
            .push(*cfg)
            .map_err(|_| HwInitError::GpioConfigFailed(-1))
    }
}

/// In-memory interrupt dispatcher.
#[derive(Debug, Default)]
pub struct SimInterrupts<'a, const N: usize> {
    bindings: Vec<EdgeBinding<'a, N>>,
}

impl<'a, const N: usize> SimInterrupts<'a, N> {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Pins with an attached handler, in attach order.
    pub fn attached(&self) -> Vec<PinId> {
        self.bindings.iter().map(EdgeBinding::pin).collect()
    }

    /// Raise the interrupt for `pin`.  Returns `None` if no handler is
    /// attached, as a masked line would.
    pub fn fire(&self, pin: PinId) -> Option<Offer> {
        self.bindings
            .iter()
            .find(|b| b.pin() == pin)
            .map(EdgeBinding::on_edge)
    }
}

impl<'a, const N: usize> EdgeRegistry<'a, N> for SimInterrupts<'a, N> {
    fn attach(&mut self, binding: EdgeBinding<'a, N>) -> Result<(), HwInitError> {
        if self.bindings.iter().any(|b| b.pin() == binding.pin()) {
            // gpio_isr_handler_add replaces silently; the sim keeps the first.
            return Ok(());
        }
        self.bindings.push(binding);
        Ok(())
    }
}
