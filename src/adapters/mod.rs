//! Adapters — concrete implementations of the port traits off-target.
//!
//! | Adapter | Implements                                   | Connects to      |
//! |---------|----------------------------------------------|------------------|
//! | `sim`   | LevelReader, LevelWriter, PinConfigurator    | in-memory pins   |
//! |         | EdgeRegistry                                 | test-driven IRQs |
//!
//! The on-target implementations live in [`crate::drivers`].

pub mod sim;
