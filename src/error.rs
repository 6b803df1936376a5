//! Unified error types for the HomeSense firmware.
//!
//! Every failure this firmware can report happens at startup: a bad pin
//! number, an inconsistent configuration, or a platform call that rejected
//! the GPIO/ISR setup.  Once the pipeline is running nothing on the
//! interrupt → task path can fail, so there are no runtime variants.
//! All variants are `Copy` so they can be passed around without allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO number outside the chip's range.
    InvalidPin(u8),
    /// Configuration is internally inconsistent.
    Config(&'static str),
    /// The platform GPIO / interrupt layer rejected a setup call.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(num) => write!(f, "invalid pin: GPIO{num}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
