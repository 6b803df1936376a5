//! GPIO driver, interrupt handlers, and task helpers.

pub mod hal_pins;
pub mod hw_init;
pub mod isr;
pub mod task_pin;
