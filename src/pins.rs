//! GPIO pin identifiers and assignments for the HomeSense sensor board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Pin numbers are wrapped in [`PinId`], which can only be built for lines
//! that exist on the chip.  An out-of-range number is a configuration error
//! caught at startup, never at interrupt time.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of GPIO lines on the ESP32 (`GPIO_NUM_MAX`).
pub const PIN_COUNT: u8 = 40;

// ---------------------------------------------------------------------------
// Pin identifier
// ---------------------------------------------------------------------------

/// A validated GPIO line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PinId(u8);

impl PinId {
    /// Build a pin id, or `None` if the line does not exist.
    pub const fn new(num: u8) -> Option<Self> {
        if num < PIN_COUNT { Some(Self(num)) } else { None }
    }

    /// Build a pin id from a board constant.  Fails to compile when used in
    /// a `const` with an out-of-range number.
    const fn board(num: u8) -> Self {
        match Self::new(num) {
            Some(pin) => pin,
            None => panic!("board pin out of range"),
        }
    }

    /// Raw GPIO number.
    pub const fn num(self) -> u8 {
        self.0
    }

    /// Single-bit mask for `gpio_config_t::pin_bit_mask`.
    pub const fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl TryFrom<u8> for PinId {
    type Error = Error;

    fn try_from(num: u8) -> Result<Self, Self::Error> {
        Self::new(num).ok_or(Error::InvalidPin(num))
    }
}

impl From<PinId> for u8 {
    fn from(pin: PinId) -> Self {
        pin.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Logic level
// ---------------------------------------------------------------------------

/// Digital level on a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The opposite level.
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Raw register value: zero is `Low`, anything else `High`.
impl From<u8> for Level {
    fn from(raw: u8) -> Self {
        Self::from(raw != 0)
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        u8::from(level.is_high())
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Piezo buzzer — the actuator driven by every sensor event (active HIGH).
pub const BUZZER_GPIO: PinId = PinId::board(26);
/// Pan servo signal (configured as a plain output, currently idle).
pub const SERVO_1_GPIO: PinId = PinId::board(21);
/// Tilt servo signal (configured as a plain output, currently idle).
pub const SERVO_2_GPIO: PinId = PinId::board(19);

// ---------------------------------------------------------------------------
// Inputs (external pull-ups, interrupt-driven)
// ---------------------------------------------------------------------------

/// IR break-beam sensor 1.  Output goes LOW when the beam is interrupted.
pub const IR_1_GPIO: PinId = PinId::board(23);
/// IR break-beam sensor 2.  Output goes LOW when the beam is interrupted.
pub const IR_2_GPIO: PinId = PinId::board(22);
/// Vibration switch.  Toggles on both edges while shaken.
pub const VIBRATE_GPIO: PinId = PinId::board(27);
