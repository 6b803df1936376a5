//! ESP-IDF GPIO driver.
//!
//! Configures pin direction, pulls and interrupt type with raw ESP-IDF sys
//! calls, and exposes level read/write through the pipeline's port traits.
//! Configuration happens once from `main()` before interrupts are attached.
//! Output levels are left to the caller; the pipeline switches the actuator
//! off right after configuring.

// ── Error type ────────────────────────────────────────────────

/// Errors from one-shot GPIO / interrupt setup.  Carries the ESP-IDF return
/// code where there is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrAttachFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAttachFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub use esp::EspGpio;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sys::*;
    use log::info;

    use super::HwInitError;
    use crate::app::ports::{LevelReader, LevelWriter, PinConfigurator};
    use crate::config::{Direction, Edge, PinConfig, Pull};
    use crate::pins::{Level, PinId};

    /// Handle to the GPIO matrix.  Zero-sized; every call is a register access.
    #[derive(Debug, Clone, Copy)]
    pub struct EspGpio {
        _private: (),
    }

    impl EspGpio {
        /// Only `main()` constructs this, once.
        pub fn take() -> Self {
            Self { _private: () }
        }
    }

    fn intr_type(edge: Edge) -> gpio_int_type_t {
        match edge {
            Edge::None => gpio_int_type_t_GPIO_INTR_DISABLE,
            Edge::Rising => gpio_int_type_t_GPIO_INTR_POSEDGE,
            Edge::Falling => gpio_int_type_t_GPIO_INTR_NEGEDGE,
            Edge::Both => gpio_int_type_t_GPIO_INTR_ANYEDGE,
        }
    }

    impl PinConfigurator for EspGpio {
        fn configure(&mut self, cfg: &PinConfig) -> Result<(), HwInitError> {
            let gpio_cfg = gpio_config_t {
                pin_bit_mask: cfg.pin.mask(),
                mode: match cfg.direction {
                    Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
                    Direction::Output => gpio_mode_t_GPIO_MODE_OUTPUT,
                },
                pull_up_en: if cfg.pull == Pull::Up {
                    gpio_pullup_t_GPIO_PULLUP_ENABLE
                } else {
                    gpio_pullup_t_GPIO_PULLUP_DISABLE
                },
                pull_down_en: if cfg.pull == Pull::Down {
                    gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
                } else {
                    gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
                },
                intr_type: intr_type(cfg.edge),
            };
            // SAFETY: called from the single main task before the ISR service
            // and the pipeline tasks start.
            let ret = unsafe { gpio_config(&gpio_cfg) };
            if ret != ESP_OK as i32 {
                return Err(HwInitError::GpioConfigFailed(ret));
            }
            info!("hw_init: {} configured ({:?}, pull={:?}, edge={:?})", cfg.pin, cfg.direction, cfg.pull, cfg.edge);
            Ok(())
        }
    }

    impl LevelReader for EspGpio {
        fn get_level(&self, pin: PinId) -> Level {
            // SAFETY: gpio_get_level is a read-only register access on a
            // configured pin.
            Level::from(unsafe { gpio_get_level(i32::from(pin.num())) } as u8)
        }
    }

    impl LevelWriter for EspGpio {
        fn set_level(&self, pin: PinId, level: Level) {
            // SAFETY: single register write on a configured output; atomic
            // with respect to other tasks writing the same pin.
            unsafe {
                gpio_set_level(i32::from(pin.num()), u32::from(u8::from(level)));
            }
        }
    }
}
