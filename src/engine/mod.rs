//! Engine module
//!
//! Audio output: the playback state machine, the cpal backend and the
//! lock-free event queue from the audio callback to the UI.

pub mod audio_engine;
pub mod channels;
pub mod events;
pub mod playback;

pub use audio_engine::{AudioEngine, AudioError, DeviceInfo, StreamInfo};
pub use channels::{event_channel, EventReceiver, EventSender, DEFAULT_EVENT_BUFFER_SIZE};
pub use events::EngineEvent;
pub use playback::{OutputBackend, PlaybackController, PlaybackState};
