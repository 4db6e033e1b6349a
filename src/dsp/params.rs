//! Shared generator parameters.
//!
//! The UI writes, the audio callback and the preview read. Every write
//! publishes a complete [`SignalParams`] snapshot under one lock, so a reader
//! never sees a new frequency paired with an old shape.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use serde::{Deserialize, Serialize};

use super::waveform::{Rectification, WaveShape};
use crate::units::{self, ParseError};

/// Slider range for the duty cycle, in percent.
pub const DUTY_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 1..=99;

/// Slider range for both amplitudes, in percent.
pub const AMPLITUDE_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 0..=100;

/// Slider range for the preview timebase.
pub const TIMEBASE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// One complete generator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// Output frequency in Hz. Non-positive values mean silence.
    pub frequency: f64,
    /// Waveform shape.
    pub shape: WaveShape,
    /// Fraction of a square period spent high.
    pub duty_cycle: f64,
    /// Rectification mode.
    pub rectification: Rectification,
    /// Scale of positive excursions (and negative ones when symmetric), 0..=1.
    pub amplitude_positive: f64,
    /// Scale of negative excursions in asymmetric mode, 0..=1.
    pub amplitude_negative: f64,
    /// Whether negative excursions use `amplitude_negative`.
    pub asymmetric: bool,
    /// Show the fixed reference sine in the preview.
    pub dual_trace: bool,
    /// Preview horizontal compression. Has no effect on audio.
    pub timebase: u32,
    /// Preview phase is held while set.
    pub frozen: bool,
    /// Mirrors the playback state.
    pub playing: bool,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            shape: WaveShape::Sine,
            duty_cycle: 0.5,
            rectification: Rectification::Full,
            amplitude_positive: 0.05,
            amplitude_negative: 0.05,
            asymmetric: false,
            dual_trace: false,
            timebase: 10,
            frozen: false,
            playing: false,
        }
    }
}

impl SignalParams {
    /// Amplitude applied to a value of the given sign.
    pub fn amplitude_for(&self, value: f64) -> f64 {
        if self.asymmetric && value < 0.0 {
            self.amplitude_negative
        } else {
            self.amplitude_positive
        }
    }
}

/// Cloneable handle to the shared parameter record.
#[derive(Clone, Debug, Default)]
pub struct ParameterStore {
    inner: Arc<Mutex<SignalParams>>,
}

impl ParameterStore {
    /// Create a store holding `initial`.
    pub fn new(initial: SignalParams) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SignalParams> {
        // The record is plain data; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy out the current snapshot.
    pub fn snapshot(&self) -> SignalParams {
        *self.lock()
    }

    /// Copy out the current snapshot without waiting.
    ///
    /// Returns `None` while a writer holds the lock. Used from the audio
    /// callback, which keeps its previous snapshot in that case.
    pub fn try_snapshot(&self) -> Option<SignalParams> {
        match self.inner.try_lock() {
            Ok(guard) => Some(*guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(*poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Replace the whole snapshot.
    pub fn apply(&self, params: SignalParams) {
        *self.lock() = params;
    }

    /// Edit a copy of the snapshot and publish it in one step.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut SignalParams),
    {
        let mut guard = self.lock();
        let mut next = *guard;
        edit(&mut next);
        *guard = next;
    }

    /// Set the frequency from user text (`440`, `1,5k`).
    ///
    /// On error the previous frequency stays in force.
    pub fn set_frequency_text(&self, text: &str) -> Result<f64, ParseError> {
        let frequency = units::parse_value(text)?;
        self.update(|p| p.frequency = frequency);
        log::debug!("Frequency set to {} Hz", frequency);
        Ok(frequency)
    }

    /// Set the waveform shape.
    pub fn set_shape(&self, shape: WaveShape) {
        self.update(|p| p.shape = shape);
    }

    /// Set the rectification mode.
    pub fn set_rectification(&self, rectification: Rectification) {
        self.update(|p| p.rectification = rectification);
    }

    /// Set the duty cycle from its slider position in percent.
    pub fn set_duty_percent(&self, percent: u32) {
        let duty = f64::from(percent) / 100.0;
        self.update(|p| p.duty_cycle = duty);
    }

    /// Set the positive (or symmetric) amplitude from percent.
    pub fn set_amplitude_positive_percent(&self, percent: u32) {
        let amplitude = f64::from(percent.min(100)) / 100.0;
        self.update(|p| p.amplitude_positive = amplitude);
    }

    /// Set the negative amplitude from percent.
    pub fn set_amplitude_negative_percent(&self, percent: u32) {
        let amplitude = f64::from(percent.min(100)) / 100.0;
        self.update(|p| p.amplitude_negative = amplitude);
    }

    /// Enable or disable independent negative amplitude.
    pub fn set_asymmetric(&self, asymmetric: bool) {
        self.update(|p| p.asymmetric = asymmetric);
    }

    /// Show or hide the preview reference trace.
    pub fn set_dual_trace(&self, dual_trace: bool) {
        self.update(|p| p.dual_trace = dual_trace);
    }

    /// Set the preview timebase. Zero is raised to one.
    pub fn set_timebase(&self, timebase: u32) {
        let timebase = timebase.max(1);
        self.update(|p| p.timebase = timebase);
    }

    pub(crate) fn set_frozen(&self, frozen: bool) {
        self.update(|p| p.frozen = frozen);
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.update(|p| p.playing = playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_generator_startup() {
        let params = SignalParams::default();
        assert_eq!(params.frequency, 440.0);
        assert_eq!(params.shape, WaveShape::Sine);
        assert_eq!(params.rectification, Rectification::Full);
        assert!((params.amplitude_positive - 0.05).abs() < f64::EPSILON);
        assert!(!params.asymmetric);
        assert_eq!(params.timebase, 10);
        assert!(!params.frozen);
        assert!(!params.playing);
    }

    #[test]
    fn test_apply_replaces_whole_snapshot() {
        let store = ParameterStore::default();
        let next = SignalParams {
            frequency: 1000.0,
            shape: WaveShape::Triangle,
            asymmetric: true,
            ..SignalParams::default()
        };
        store.apply(next);
        assert_eq!(store.snapshot(), next);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        use std::thread;

        let low = SignalParams::default();
        let high = SignalParams {
            frequency: 5000.0,
            shape: WaveShape::Square,
            rectification: Rectification::Half,
            amplitude_positive: 0.9,
            timebase: 50,
            ..SignalParams::default()
        };
        let store = ParameterStore::new(low);

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..5000 {
                    store.apply(if i % 2 == 0 { high } else { low });
                }
            })
        };
        let readers: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..5000 {
                        let seen = store.snapshot();
                        assert!(seen == low || seen == high, "mixed snapshot: {:?}", seen);
                        if let Some(seen) = store.try_snapshot() {
                            assert!(seen == low || seen == high, "mixed snapshot: {:?}", seen);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.snapshot(), low);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ParameterStore::default();
        let reader = store.clone();
        store.set_shape(WaveShape::Square);
        assert_eq!(reader.snapshot().shape, WaveShape::Square);
    }

    #[test]
    fn test_frequency_text_accepts_comma() {
        let store = ParameterStore::default();
        assert_eq!(store.set_frequency_text("1,5k"), Ok(1500.0));
        assert_eq!(store.snapshot().frequency, 1500.0);
    }

    #[test]
    fn test_invalid_frequency_keeps_previous_value() {
        let store = ParameterStore::default();
        store.set_frequency_text("1000").unwrap();
        let before = store.snapshot();

        assert!(store.set_frequency_text("12abc3").is_err());
        assert!(store.set_frequency_text("").is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_percent_setters() {
        let store = ParameterStore::default();
        store.set_duty_percent(25);
        store.set_amplitude_positive_percent(80);
        store.set_amplitude_negative_percent(250);
        let p = store.snapshot();
        assert!((p.duty_cycle - 0.25).abs() < f64::EPSILON);
        assert!((p.amplitude_positive - 0.8).abs() < f64::EPSILON);
        assert_eq!(p.amplitude_negative, 1.0);
    }

    #[test]
    fn test_timebase_never_zero() {
        let store = ParameterStore::default();
        store.set_timebase(0);
        assert_eq!(store.snapshot().timebase, 1);
        store.set_timebase(42);
        assert_eq!(store.snapshot().timebase, 42);
    }

    #[test]
    fn test_amplitude_for_sign() {
        let mut params = SignalParams {
            amplitude_positive: 0.8,
            amplitude_negative: 0.2,
            ..SignalParams::default()
        };
        assert_eq!(params.amplitude_for(-0.5), 0.8);
        params.asymmetric = true;
        assert_eq!(params.amplitude_for(-0.5), 0.2);
        assert_eq!(params.amplitude_for(0.0), 0.8);
        assert_eq!(params.amplitude_for(0.5), 0.8);
    }

    #[test]
    fn test_try_snapshot_when_unlocked() {
        let store = ParameterStore::default();
        assert_eq!(store.try_snapshot(), Some(SignalParams::default()));
    }

    #[test]
    fn test_try_snapshot_while_locked() {
        let store = ParameterStore::default();
        let _guard = store.inner.lock().unwrap();
        assert_eq!(store.try_snapshot(), None);
    }

    #[test]
    fn test_params_serde_defaults_missing_fields() {
        let params: SignalParams = serde_json::from_str(r#"{"frequency": 1000.0}"#).unwrap();
        assert_eq!(params.frequency, 1000.0);
        assert_eq!(params.shape, WaveShape::Sine);
        assert_eq!(params.timebase, 10);
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParameterStore>();
    }
}
