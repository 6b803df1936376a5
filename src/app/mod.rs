//! Application core — the event pipeline, independent of the platform.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`], so everything here runs unchanged against the host simulation.

pub mod consumer;
pub mod pipeline;
pub mod ports;
pub mod reset;
