//! Engine Channels
//!
//! Lock-free communication from the audio callback to the UI thread.
//! Uses an rtrb ring buffer as an SPSC (single-producer, single-consumer) queue.

use rtrb::{Consumer, Producer, RingBuffer};

use super::events::EngineEvent;

/// Default buffer size for the event queue (Engine -> UI).
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

/// Create an event queue with the given capacity.
///
/// The sender moves into the audio callback, the receiver stays with the UI.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (event_tx, event_rx) = RingBuffer::new(capacity);
    (EventSender { event_tx }, EventReceiver { event_rx })
}

/// Create an event queue with the default capacity.
pub fn default_event_channel() -> (EventSender, EventReceiver) {
    event_channel(DEFAULT_EVENT_BUFFER_SIZE)
}

/// Engine-side handle: pushes events from the audio callback.
///
/// IMPORTANT: All methods are designed to be real-time safe (non-blocking, no allocations).
pub struct EventSender {
    event_tx: Producer<EngineEvent>,
}

impl EventSender {
    /// Send an event to the UI.
    /// Returns Ok(()) if the event was queued, or Err(event) if the buffer is full.
    ///
    /// REAL-TIME SAFE: Non-blocking operation.
    pub fn send_event(&mut self, event: EngineEvent) -> Result<(), EngineEvent> {
        self.event_tx
            .push(event)
            .map_err(|rtrb::PushError::Full(event)| event)
    }

    /// Try to send an event, dropping it silently if the buffer is full.
    /// Use this for metering data where dropping values is acceptable.
    ///
    /// REAL-TIME SAFE: Non-blocking, no allocations.
    pub fn send_event_lossy(&mut self, event: EngineEvent) {
        let _ = self.event_tx.push(event);
    }

    /// Check how many events can still be queued.
    pub fn event_slots_available(&self) -> usize {
        self.event_tx.slots()
    }
}

/// UI-side handle: receives events from the audio callback.
pub struct EventReceiver {
    event_rx: Consumer<EngineEvent>,
}

impl EventReceiver {
    /// Receive an event from the audio engine.
    /// Returns Some(event) if available, None if no events pending.
    ///
    /// This is a non-blocking operation.
    pub fn recv_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.pop().ok()
    }

    /// Drain all pending events from the engine.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        std::iter::from_fn(|| self.recv_event())
    }

    /// Number of events waiting to be read.
    pub fn events_pending(&self) -> usize {
        self.event_rx.slots()
    }
}
