//! GPIO edge interrupt handlers.
//!
//! Each monitored input gets one [`EdgeBinding`]: the pin's typed id plus a
//! reference to the event channel.  The binding is built once at startup and
//! is the only context the interrupt receives, so the handler never has to
//! look anything up.
//!
//! ## Interrupt-context contract
//!
//! [`EdgeBinding::on_edge`] performs exactly one [`EventChannel::offer`].
//! No logging, no allocation, no actuator access.  If the channel is full the
//! event is lost according to the channel's overflow policy; the consumer
//! re-reads the live pin level on the next event, which bounds the damage.
//!
//! On ESP-IDF the binding is leaked to `'static` and its address is the
//! `void*` argument of `gpio_isr_handler_add`.  The trampoline casts it back
//! to the same concrete type it was registered with.

use crate::events::{EventChannel, Offer};
use crate::pins::PinId;

/// A pin → channel association, fixed at registration time.
#[derive(Debug, Clone, Copy)]
pub struct EdgeBinding<'a, const N: usize> {
    pin: PinId,
    channel: &'a EventChannel<N>,
}

impl<'a, const N: usize> EdgeBinding<'a, N> {
    pub const fn new(pin: PinId, channel: &'a EventChannel<N>) -> Self {
        Self { pin, channel }
    }

    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Interrupt handler body.  Safe to call from ISR context.
    #[inline]
    pub fn on_edge(&self) -> Offer {
        self.channel.offer(self.pin)
    }
}

// ── ESP-IDF registration ──────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspEdgeRegistry;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sys::*;
    use log::info;

    use super::EdgeBinding;
    use crate::app::ports::EdgeRegistry;
    use crate::drivers::hw_init::HwInitError;

    /// ISR trampoline registered for every monitored pin.
    unsafe extern "C" fn edge_isr<const N: usize>(arg: *mut core::ffi::c_void) {
        // SAFETY: `arg` is the address of a leaked `EdgeBinding<'static, N>`
        // registered by `EspEdgeRegistry::attach` with this same `N`; it is
        // never freed or mutated.
        let binding = unsafe { &*(arg as *const EdgeBinding<'static, N>) };
        binding.on_edge();
    }

    /// Registers bindings with the ESP-IDF per-pin GPIO ISR service.
    pub struct EspEdgeRegistry {
        _private: (),
    }

    impl EspEdgeRegistry {
        /// Install the per-pin ISR service.  Idempotent.
        pub fn install() -> Result<Self, HwInitError> {
            // SAFETY: gpio_install_isr_service is idempotent;
            // ESP_ERR_INVALID_STATE means it was already installed.
            let ret = unsafe { gpio_install_isr_service(0) };
            if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
            info!("isr: GPIO ISR service installed");
            Ok(Self { _private: () })
        }
    }

    impl<const N: usize> EdgeRegistry<'static, N> for EspEdgeRegistry {
        fn attach(&mut self, binding: EdgeBinding<'static, N>) -> Result<(), HwInitError> {
            let pin = binding.pin();
            let gpio = i32::from(pin.num());
            // Lives for the rest of the process; the ISR service holds its address.
            let leaked: &'static EdgeBinding<'static, N> = Box::leak(Box::new(binding));
            let arg = core::ptr::from_ref(leaked).cast_mut().cast::<core::ffi::c_void>();

            // SAFETY: pin was configured as an edge-triggered input by
            // EspGpio::configure; `arg` outlives the registration.
            let ret = unsafe { gpio_isr_handler_add(gpio, Some(edge_isr::<N>), arg) };
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrAttachFailed(ret));
            }
            // SAFETY: enabling the interrupt on a configured pin.
            let ret = unsafe { gpio_intr_enable(gpio) };
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrAttachFailed(ret));
            }
            info!("isr: {} attached", pin);
            Ok(())
        }
    }
}
