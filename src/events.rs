//! Interrupt → task event channel.
//!
//! GPIO interrupt handlers produce pin identifiers; a single consumer task
//! takes them out in FIFO order.
//!
//! ```text
//! ┌─────────────┐
//! │ IR_1 ISR    │────▶┌──────────────────┐     ┌──────────────────┐
//! │ IR_2 ISR    │────▶│  EventChannel<N> │────▶│  EventConsumer   │
//! │ VIBRATE ISR │────▶│  (critical sect.)│     │  (task context)  │
//! └─────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! The producer side ([`EventChannel::offer`]) is safe to call from interrupt
//! context: it never blocks, never allocates and runs in constant time.  All
//! cursor updates happen inside a critical section, so nested or concurrent
//! interrupts on either core cannot corrupt the queue.
//!
//! The consumer side ([`EventChannel::take`]) is a future.  While the queue is
//! empty the consumer task is parked on a registered waker and receives no
//! CPU time until the next `offer` wakes it.
//!
//! ## Overflow
//!
//! A full channel never blocks the interrupt.  What happens to the event is
//! decided by [`OverflowPolicy`], fixed when the channel is created:
//!
//! | Policy            | Newest event | Oldest event | `offer` returns     |
//! |-------------------|--------------|--------------|---------------------|
//! | `DropNewest`      | discarded    | kept         | `Offer::Dropped`    |
//! | `OverwriteOldest` | queued       | discarded    | `Offer::Displaced`  |
//!
//! Either way one event is lost and [`EventChannel::dropped`] goes up by one.

use core::cell::RefCell;
use core::future::{Future, poll_fn};
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::waitqueue::WakerRegistration;
use heapless::Deque;
use serde::{Deserialize, Serialize};

use crate::pins::PinId;

/// Default channel depth — matches the sensor board's burst budget.
pub const EVENT_QUEUE_CAP: usize = 10;

/// The channel type used by the firmware.
pub type PinEventChannel = EventChannel<EVENT_QUEUE_CAP>;

/// What a full channel does with one more event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Keep the queued events, discard the incoming one.
    #[default]
    DropNewest,
    /// Discard the oldest queued event to make room for the incoming one.
    OverwriteOldest,
}

/// Result of [`EventChannel::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The event was appended.
    Queued,
    /// The channel was full; the offered event was discarded.
    Dropped,
    /// The channel was full; the offered event was appended and the
    /// returned oldest event was discarded.
    Displaced(PinId),
}

impl Offer {
    /// True if the offered event will be delivered.
    pub const fn accepted(self) -> bool {
        !matches!(self, Self::Dropped)
    }
}

struct State<const N: usize> {
    queue: Deque<PinId, N>,
    consumer: WakerRegistration,
    dropped: u32,
}

/// Fixed-capacity interrupt-safe FIFO of pin identifiers.
pub struct EventChannel<const N: usize> {
    state: Mutex<CriticalSectionRawMutex, RefCell<State<N>>>,
    policy: OverflowPolicy,
}

impl<const N: usize> EventChannel<N> {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                queue: Deque::new(),
                consumer: WakerRegistration::new(),
                dropped: 0,
            })),
            policy,
        }
    }

    /// Push an event.  Safe to call from interrupt context.
    ///
    /// Wakes the consumer whenever an event was queued.
    pub fn offer(&self, pin: PinId) -> Offer {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();

            let outcome = match state.queue.push_back(pin) {
                Ok(()) => Offer::Queued,
                Err(pin) => match self.policy {
                    OverflowPolicy::DropNewest => Offer::Dropped,
                    OverflowPolicy::OverwriteOldest => match state.queue.pop_front() {
                        Some(oldest) => {
                            // Slot was just freed; cannot fail.
                            let _ = state.queue.push_back(pin);
                            Offer::Displaced(oldest)
                        }
                        // A full channel always has a head.
                        None => Offer::Dropped,
                    },
                },
            };

            if outcome != Offer::Queued {
                state.dropped = state.dropped.wrapping_add(1);
            }
            if outcome.accepted() {
                state.consumer.wake();
            }
            outcome
        })
    }

    /// Wait for the next event.  Task context only.
    ///
    /// Resolves immediately if an event is queued; otherwise parks the
    /// calling task until the next accepted `offer`.
    pub fn take(&self) -> impl Future<Output = PinId> + '_ {
        poll_fn(move |cx| self.poll_take(cx))
    }

    /// Poll form of [`take`](Self::take).
    ///
    /// Only one consumer may wait at a time: registering a second waker
    /// replaces the first.
    pub fn poll_take(&self, cx: &mut Context<'_>) -> Poll<PinId> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            match state.queue.pop_front() {
                Some(pin) => Poll::Ready(pin),
                None => {
                    state.consumer.register(cx.waker());
                    Poll::Pending
                }
            }
        })
    }

    /// Pop an event without waiting.
    pub fn try_take(&self) -> Option<PinId> {
        self.state.lock(|state| state.borrow_mut().queue.pop_front())
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.state.lock(|state| state.borrow().queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub const fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Total events lost to overflow since boot (wraps at `u32::MAX`).
    pub fn dropped(&self) -> u32 {
        self.state.lock(|state| state.borrow().dropped)
    }
}

impl<const N: usize> core::fmt::Debug for EventChannel<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventChannel")
            .field("capacity", &N)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<const N: usize> Default for EventChannel<N> {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}
