//! Core-pinned tasks for the consumer and the reset loop.
//!
//! On ESP-IDF each task is a pthread whose core, priority and stack come
//! from `esp_pthread_set_cfg()`, which applies to the next spawn from the
//! calling thread.  On the host it is a plain named thread.
//!
//! [`block_on`] drives the consumer's future.  The channel wakes it from
//! interrupt context, so on ESP-IDF the waker must be ISR-safe:
//! `esp_idf_hal::task::block_on` uses a FreeRTOS task notification.  On the
//! host, `futures-lite` parks the thread.

use core::future::Future;

use serde::{Deserialize, Serialize};

/// CPU core identifiers for the ESP32 Xtensa LX6 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — protocol stacks, main task.
    Pro = 0,
    /// Core 1 (APP_CPU) — application tasks.
    App = 1,
}

/// Spawn a task pinned to `core`.  `name` must be null-terminated
/// (e.g. `"edge-consumer\0"`).
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    // SAFETY: esp_create_default_pthread_config returns a plain struct;
    // `name` is 'static and null-terminated, as esp_pthread_set_cfg requires.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = priority as i32;
        cfg.stack_size = (stack_kb * 1024) as _;
        cfg.thread_name = name.as_ptr() as *const _;
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(std::io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
        }
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new().name(display_name.into()).spawn(f)
}

/// Simulation fallback — ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}

/// Drive `fut` to completion on the calling task, sleeping while it is pending.
#[cfg(target_os = "espidf")]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    esp_idf_hal::task::block_on(fut)
}

/// Drive `fut` to completion on the calling thread, parked while it is pending.
#[cfg(not(target_os = "espidf"))]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    futures_lite::future::block_on(fut)
}
