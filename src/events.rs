//! Callback-to-main-loop event queue.
//!
//! Events are produced by:
//! - the periodic provisioning timer callback (tick)
//! - Wi-Fi driver event callbacks (AP client join/leave)
//!
//! Events are consumed by the main loop, which processes them one at a
//! time in FIFO order.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer callback  │────▶│              │     │              │
//! │ Wi-Fi callback  │────▶│  Event Queue │────▶│  Main Loop   │
//! │                 │     │  (lock-free) │     │  (consumer)  │
//! └─────────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// Queue-borne event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Periodic provisioning tick fired.
    ControlTick = 0,
    /// A client joined the provisioning access point.
    ApClientConnected = 1,
    /// A client left the provisioning access point.
    ApClientDisconnected = 2,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Callback contexts write (produce), main loop reads (consume).
// Uses atomic head/tail indices. The buffer is intentionally kept in a
// static so driver callbacks can access it without a handle.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER slots are written only by the producer side
// (push_event, timer/Wi-Fi callback context) at indices the consumer has
// released, and read only by the consumer side (pop_event, main loop) at
// indices the producer has published. The Acquire/Release pairs on
// EVENT_HEAD/EVENT_TAIL order those accesses.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; this slot is not readable by the consumer
    // until the Release store below publishes it.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the Acquire load of EVENT_HEAD above
    // ordered this slot's write before this read.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::ControlTick),
        1 => Some(Event::ApClientConnected),
        2 => Some(Event::ApClientDisconnected),
        _ => None,
    }
}
