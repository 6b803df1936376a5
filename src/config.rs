//! System configuration parameters
//!
//! Pin table, actuator selection, channel overflow policy and task timing
//! for the HomeSense board.  [`SystemConfig::default`] reproduces the board
//! wiring in [`crate::pins`].

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::drivers::task_pin::Core;
use crate::error::{Error, Result};
use crate::events::OverflowPolicy;
use crate::pins::{self, Level, PinId};

/// Maximum number of entries in the pin table.
pub const MAX_PINS: usize = 16;

/// Fewest edge-triggered inputs the pipeline is built for.
pub const MIN_EDGE_INPUTS: usize = 2;

/// Highest FreeRTOS task priority (`configMAX_PRIORITIES - 1` on ESP-IDF).
pub const MAX_TASK_PRIORITY: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Which transitions raise an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    None,
    Rising,
    Falling,
    Both,
}

/// Per-pin setup handed to the platform GPIO driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    pub pin: PinId,
    pub direction: Direction,
    pub pull: Pull,
    pub edge: Edge,
}

impl PinConfig {
    /// Push-pull output, no pulls, no interrupt.
    pub const fn output(pin: PinId) -> Self {
        Self {
            pin,
            direction: Direction::Output,
            pull: Pull::None,
            edge: Edge::None,
        }
    }

    /// Pulled-up input interrupting on `edge`.
    pub const fn pulled_up_input(pin: PinId, edge: Edge) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            pull: Pull::Up,
            edge,
        }
    }

    /// True if this pin needs an interrupt binding.
    pub const fn is_edge_input(&self) -> bool {
        matches!(self.direction, Direction::Input) && !matches!(self.edge, Edge::None)
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Pins ---
    /// Every pin the firmware touches.
    pub pins: Vec<PinConfig, MAX_PINS>,
    /// Output driven on each sensor event.
    pub actuator: PinId,
    /// Level that turns the actuator on.
    pub actuator_active: Level,

    // --- Event channel ---
    /// What to do with an edge when the channel is full.
    pub overflow: OverflowPolicy,

    // --- Timing ---
    /// Period of the actuator reset loop (milliseconds).
    pub reset_interval_ms: u32,

    // --- Tasks ---
    /// Core the event consumer task is pinned to.
    pub consumer_core: Core,
    /// FreeRTOS priority of the event consumer task.
    pub consumer_priority: u8,
    /// Stack size of the event consumer task (KB).
    pub consumer_stack_kb: usize,
    /// Core the reset loop task is pinned to.
    pub reset_core: Core,
    /// FreeRTOS priority of the reset loop task.
    pub reset_priority: u8,
    /// Stack size of the reset loop task (KB).
    pub reset_stack_kb: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut table = Vec::new();
        for cfg in [
            PinConfig::output(pins::BUZZER_GPIO),
            PinConfig::output(pins::SERVO_1_GPIO),
            PinConfig::output(pins::SERVO_2_GPIO),
            PinConfig::pulled_up_input(pins::IR_1_GPIO, Edge::Falling),
            PinConfig::pulled_up_input(pins::IR_2_GPIO, Edge::Falling),
            PinConfig::pulled_up_input(pins::VIBRATE_GPIO, Edge::Both),
        ] {
            // Six entries always fit in MAX_PINS.
            let _ = table.push(cfg);
        }

        Self {
            pins: table,
            actuator: pins::BUZZER_GPIO,
            actuator_active: Level::High,

            overflow: OverflowPolicy::DropNewest,

            reset_interval_ms: 1000, // 1 Hz

            consumer_core: Core::App,
            consumer_priority: 10,
            consumer_stack_kb: 4,
            reset_core: Core::Pro,
            reset_priority: 1,
            reset_stack_kb: 4,
        }
    }
}

impl SystemConfig {
    /// Pins that get an interrupt binding, in table order.
    pub fn edge_inputs(&self) -> impl Iterator<Item = &PinConfig> + '_ {
        self.pins.iter().filter(|p| p.is_edge_input())
    }

    /// Level that turns the actuator off.
    pub fn actuator_inactive(&self) -> Level {
        self.actuator_active.inverted()
    }

    /// Check the table before anything touches hardware.
    pub fn validate(&self) -> Result<()> {
        for (i, a) in self.pins.iter().enumerate() {
            if self.pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(Error::Config("pin listed twice"));
            }
            if a.direction == Direction::Output && a.edge != Edge::None {
                return Err(Error::Config("output pin with edge trigger"));
            }
        }

        let edge_inputs = self.edge_inputs().count();
        if edge_inputs < MIN_EDGE_INPUTS {
            return Err(Error::Config("need at least two edge-triggered inputs"));
        }
        if self.edge_inputs().any(|p| p.pull != Pull::Up) {
            return Err(Error::Config("edge-triggered inputs must be pulled up"));
        }

        match self.pins.iter().find(|p| p.pin == self.actuator) {
            Some(p) if p.direction == Direction::Output => {}
            Some(_) => return Err(Error::Config("actuator is not an output")),
            None => return Err(Error::Config("actuator missing from pin table")),
        }

        if self.reset_interval_ms == 0 {
            return Err(Error::Config("reset interval must be non-zero"));
        }
        if self.consumer_stack_kb == 0 || self.reset_stack_kb == 0 {
            return Err(Error::Config("task stack must be non-zero"));
        }
        if self.consumer_priority > MAX_TASK_PRIORITY || self.reset_priority > MAX_TASK_PRIORITY {
            return Err(Error::Config("task priority above configMAX_PRIORITIES"));
        }
        Ok(())
    }
}
