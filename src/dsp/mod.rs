//! DSP module
//!
//! Signal generator core: the waveform model, the shared parameter store,
//! the audio sample producer and the preview renderer.

pub mod params;
pub mod preview;
pub mod producer;
pub mod waveform;

pub use params::{ParameterStore, SignalParams};
pub use preview::{FreezeController, PreviewFrame, PreviewRenderer};
pub use producer::SampleProducer;
pub use waveform::{evaluate, Rectification, WaveShape};
