//! Playback Controller
//!
//! Two-state machine that opens and closes the output device. The device
//! itself sits behind [`OutputBackend`] so the transitions can be exercised
//! without audio hardware.

use crate::dsp::{ParameterStore, SampleProducer};

use super::audio_engine::AudioError;

/// Whether audio is currently being delivered to a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    /// Label for the start/stop control.
    pub fn action_label(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Start",
            PlaybackState::Playing => "Stop",
        }
    }
}

/// An audio output that can pull from a [`SampleProducer`].
pub trait OutputBackend {
    /// Live stream handle. Dropping or closing it ends playback.
    type Stream;

    /// Resolve the device and return the sample rate it will run at.
    fn prepare(&mut self) -> Result<u32, AudioError>;

    /// Open the prepared device and start pulling from `producer`.
    fn open(&mut self, producer: SampleProducer) -> Result<Self::Stream, AudioError>;

    /// Stop pulling and release the device.
    fn close(&mut self, stream: Self::Stream) -> Result<(), AudioError>;
}

/// Starts and stops audio delivery for one parameter store.
pub struct PlaybackController<B: OutputBackend> {
    backend: B,
    params: ParameterStore,
    stream: Option<B::Stream>,
}

impl<B: OutputBackend> PlaybackController<B> {
    pub fn new(backend: B, params: ParameterStore) -> Self {
        Self {
            backend,
            params,
            stream: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.stream.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Begin delivering audio from phase zero.
    ///
    /// Starting while already playing does nothing. On failure the
    /// controller stays stopped and the error is returned.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.stream.is_some() {
            log::debug!("Start requested while already playing");
            return Ok(());
        }

        let sample_rate = self.backend.prepare()?;
        let producer = SampleProducer::new(self.params.clone(), sample_rate);
        let stream = self.backend.open(producer)?;

        self.stream = Some(stream);
        self.params.set_playing(true);
        log::info!("Playback started at {} Hz", sample_rate);
        Ok(())
    }

    /// Stop delivering audio and release the device.
    ///
    /// The controller is stopped afterwards even if the device reports an
    /// error while closing.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        let Some(stream) = self.stream.take() else {
            log::debug!("Stop requested while already stopped");
            return Ok(());
        };

        self.params.set_playing(false);
        let result = self.backend.close(stream);
        log::info!("Playback stopped");
        result
    }

    /// Flip between playing and stopped, returning the new state.
    pub fn toggle(&mut self) -> Result<PlaybackState, AudioError> {
        match self.state() {
            PlaybackState::Stopped => self.start()?,
            PlaybackState::Playing => self.stop()?,
        }
        Ok(self.state())
    }

    /// Stop and start again, picking up a new device selection.
    pub fn restart(&mut self) -> Result<(), AudioError> {
        if !self.is_playing() {
            return Ok(());
        }
        if let Err(e) = self.stop() {
            log::warn!("Error closing stream before restart: {}", e);
        }
        self.start()
    }
}

impl<B: OutputBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Error closing stream on shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::producer::decode_samples;
    use std::sync::{Arc, Mutex};

    /// Backend that hands the producer back to the test instead of a device.
    #[derive(Default)]
    struct MockBackend {
        fail_prepare: bool,
        fail_open: bool,
        opened: usize,
        closed: usize,
        last: Option<Arc<Mutex<SampleProducer>>>,
    }

    impl OutputBackend for MockBackend {
        type Stream = Arc<Mutex<SampleProducer>>;

        fn prepare(&mut self) -> Result<u32, AudioError> {
            if self.fail_prepare {
                Err(AudioError::NoOutputDevice)
            } else {
                Ok(44100)
            }
        }

        fn open(&mut self, producer: SampleProducer) -> Result<Self::Stream, AudioError> {
            if self.fail_open {
                return Err(AudioError::StreamCreationFailed("busy".to_string()));
            }
            self.opened += 1;
            let stream = Arc::new(Mutex::new(producer));
            self.last = Some(Arc::clone(&stream));
            Ok(stream)
        }

        fn close(&mut self, _stream: Self::Stream) -> Result<(), AudioError> {
            self.closed += 1;
            Ok(())
        }
    }

    fn controller() -> (PlaybackController<MockBackend>, ParameterStore) {
        let params = ParameterStore::default();
        (PlaybackController::new(MockBackend::default(), params.clone()), params)
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let (playback, params) = controller();
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(!params.snapshot().playing);
    }

    #[test]
    fn test_start_and_stop() {
        let (mut playback, params) = controller();
        playback.start().unwrap();
        assert!(playback.is_playing());
        assert!(params.snapshot().playing);
        assert_eq!(playback.backend().opened, 1);

        playback.stop().unwrap();
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(!params.snapshot().playing);
        assert_eq!(playback.backend().closed, 1);
    }

    #[test]
    fn test_start_twice_opens_once() {
        let (mut playback, _) = controller();
        playback.start().unwrap();
        playback.start().unwrap();
        assert_eq!(playback.backend().opened, 1);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (mut playback, _) = controller();
        playback.stop().unwrap();
        assert_eq!(playback.backend().closed, 0);
    }

    #[test]
    fn test_toggle() {
        let (mut playback, _) = controller();
        assert_eq!(playback.toggle().unwrap(), PlaybackState::Playing);
        assert_eq!(playback.toggle().unwrap(), PlaybackState::Stopped);
        assert_eq!(PlaybackState::Stopped.action_label(), "Start");
        assert_eq!(PlaybackState::Playing.action_label(), "Stop");
    }

    #[test]
    fn test_failed_start_stays_stopped() {
        let (mut playback, params) = controller();
        playback.backend_mut().fail_prepare = true;
        assert!(matches!(playback.start(), Err(AudioError::NoOutputDevice)));
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(!params.snapshot().playing);

        playback.backend_mut().fail_prepare = false;
        playback.backend_mut().fail_open = true;
        assert!(playback.start().is_err());
        assert_eq!(playback.state(), PlaybackState::Stopped);

        // The user can retry once the device is available.
        playback.backend_mut().fail_open = false;
        playback.start().unwrap();
        assert!(playback.is_playing());
    }

    #[test]
    fn test_restart_begins_at_phase_zero() {
        let (mut playback, _) = controller();
        playback.start().unwrap();
        let first = playback.backend().last.clone().unwrap();
        let first_block = decode_samples(&first.lock().unwrap().pull(64));
        let _ = first.lock().unwrap().pull(1000);

        playback.stop().unwrap();
        playback.start().unwrap();
        let second = playback.backend().last.clone().unwrap();
        assert_eq!(second.lock().unwrap().phase(), 0);
        let second_block = decode_samples(&second.lock().unwrap().pull(64));
        assert_eq!(first_block, second_block);
    }

    #[test]
    fn test_restart_only_when_playing() {
        let (mut playback, _) = controller();
        playback.restart().unwrap();
        assert_eq!(playback.backend().opened, 0);

        playback.start().unwrap();
        playback.restart().unwrap();
        assert_eq!(playback.backend().opened, 2);
        assert_eq!(playback.backend().closed, 1);
        assert!(playback.is_playing());
    }

    #[test]
    fn test_drop_closes_stream() {
        let params = ParameterStore::default();
        {
            let mut playback = PlaybackController::new(MockBackend::default(), params.clone());
            playback.start().unwrap();
            assert!(params.snapshot().playing);
        }
        assert!(!params.snapshot().playing);
    }
}
