//! Pull-based PCM sample producer.
//!
//! The playback device asks for blocks of samples whenever its buffer runs
//! low. Each block continues exactly where the previous one ended: the phase
//! is a running sample count, so changing the frequency between blocks never
//! restarts the waveform.

use std::f64::consts::TAU;

use super::params::{ParameterStore, SignalParams};
use super::waveform::evaluate;

/// Full-scale value for signed 16-bit output.
pub const FULL_SCALE: f64 = 32767.0;

/// Generates signed 16-bit mono samples from the shared parameters.
pub struct SampleProducer {
    /// Samples produced since playback started.
    phase: u64,
    /// Device sample rate in Hz.
    sample_rate: u32,
    /// Parameter source.
    params: ParameterStore,
    /// Last snapshot read, reused when the store is momentarily locked.
    current: SignalParams,
}

impl SampleProducer {
    /// Creates a producer starting at phase zero.
    pub fn new(params: ParameterStore, sample_rate: u32) -> Self {
        let current = params.snapshot();
        Self {
            phase: 0,
            sample_rate,
            params,
            current,
        }
    }

    /// Samples produced so far.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Device sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Rewind to phase zero.
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Fill `out` with the next `out.len()` samples.
    ///
    /// REAL-TIME SAFE: no allocation, no blocking lock.
    pub fn fill(&mut self, out: &mut [i16]) {
        if let Some(snapshot) = self.params.try_snapshot() {
            self.current = snapshot;
        }
        let params = self.current;

        if params.frequency > 0.0 && self.sample_rate > 0 {
            let step = TAU * params.frequency / f64::from(self.sample_rate);
            for (i, sample) in out.iter_mut().enumerate() {
                let position = (self.phase + i as u64) as f64 * step;
                *sample = render_sample(position, &params);
            }
        } else {
            // Also covers NaN frequencies.
            out.fill(0);
        }

        self.phase += out.len() as u64;
    }

    /// Produce `sample_count` samples as little-endian signed 16-bit bytes.
    pub fn pull(&mut self, sample_count: usize) -> Vec<u8> {
        if sample_count == 0 {
            return Vec::new();
        }
        let mut samples = vec![0i16; sample_count];
        self.fill(&mut samples);
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Evaluate, shape the amplitude and quantise one sample.
fn render_sample(position: f64, params: &SignalParams) -> i16 {
    let value = evaluate(position, params.shape, params.duty_cycle, params.rectification);
    let scaled = value * params.amplitude_for(value) * FULL_SCALE;
    scaled.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Decode little-endian signed 16-bit bytes, as produced by [`SampleProducer::pull`].
pub fn decode_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::waveform::{Rectification, WaveShape};

    const SAMPLE_RATE: u32 = 44100;

    fn producer_with(params: SignalParams) -> SampleProducer {
        SampleProducer::new(ParameterStore::new(params), SAMPLE_RATE)
    }

    fn pull_samples(producer: &mut SampleProducer, n: usize) -> Vec<i16> {
        decode_samples(&producer.pull(n))
    }

    #[test]
    fn test_pull_zero_is_empty() {
        let mut producer = producer_with(SignalParams::default());
        assert!(producer.pull(0).is_empty());
        assert_eq!(producer.phase(), 0);
    }

    #[test]
    fn test_pull_returns_two_bytes_per_sample() {
        let mut producer = producer_with(SignalParams::default());
        assert_eq!(producer.pull(64).len(), 128);
        assert_eq!(producer.phase(), 64);
    }

    #[test]
    fn test_chunked_pulls_match_single_pull() {
        for shape in WaveShape::all() {
            let params = SignalParams {
                frequency: 1234.5,
                shape: *shape,
                duty_cycle: 0.3,
                amplitude_positive: 0.7,
                ..SignalParams::default()
            };
            let single = pull_samples(&mut producer_with(params), 1000);

            let mut chunked_producer = producer_with(params);
            let mut chunked = Vec::new();
            for size in [1, 7, 100, 256, 3, 633] {
                chunked.extend(pull_samples(&mut chunked_producer, size));
            }
            assert_eq!(chunked, single, "{:?}", shape);
        }
    }

    #[test]
    fn test_continuity_scenario_440hz() {
        let params = SignalParams {
            frequency: 440.0,
            shape: WaveShape::Sine,
            amplitude_positive: 0.05,
            asymmetric: false,
            ..SignalParams::default()
        };
        let mut split = producer_with(params);
        let _first = pull_samples(&mut split, 100);
        let second = pull_samples(&mut split, 100);

        let whole = pull_samples(&mut producer_with(params), 200);
        assert_eq!(second[0], whole[100]);
        assert_eq!(second[..], whole[100..]);
    }

    #[test]
    fn test_zero_frequency_is_silent() {
        let params = SignalParams {
            frequency: 0.0,
            amplitude_positive: 1.0,
            ..SignalParams::default()
        };
        let mut producer = producer_with(params);
        assert!(pull_samples(&mut producer, 512).iter().all(|&s| s == 0));
        assert_eq!(producer.phase(), 512);
    }

    #[test]
    fn test_negative_and_nan_frequency_are_silent() {
        for frequency in [-100.0, f64::NAN] {
            let params = SignalParams {
                frequency,
                amplitude_positive: 1.0,
                ..SignalParams::default()
            };
            let samples = pull_samples(&mut producer_with(params), 256);
            assert!(samples.iter().all(|&s| s == 0));
        }
    }

    #[test]
    fn test_asymmetric_peaks() {
        // 441 Hz at 44.1 kHz puts a sample exactly on each peak.
        let params = SignalParams {
            frequency: 441.0,
            shape: WaveShape::Sine,
            amplitude_positive: 0.8,
            amplitude_negative: 0.2,
            asymmetric: true,
            ..SignalParams::default()
        };
        let samples = pull_samples(&mut producer_with(params), 400);
        let max = *samples.iter().max().unwrap() as i32;
        let min = *samples.iter().min().unwrap() as i32;

        let expected_max = (0.8 * FULL_SCALE).round() as i32;
        let expected_min = (-0.2 * FULL_SCALE).round() as i32;
        assert!((max - expected_max).abs() <= 1, "max {}", max);
        assert!((min - expected_min).abs() <= 1, "min {}", min);
    }

    #[test]
    fn test_symmetric_ignores_negative_amplitude() {
        let params = SignalParams {
            frequency: 441.0,
            amplitude_positive: 0.5,
            amplitude_negative: 0.1,
            asymmetric: false,
            ..SignalParams::default()
        };
        let samples = pull_samples(&mut producer_with(params), 400);
        let max = *samples.iter().max().unwrap() as i32;
        let min = *samples.iter().min().unwrap() as i32;
        assert!((max + min).abs() <= 1, "max {} min {}", max, min);
    }

    #[test]
    fn test_half_rectified_output_non_negative() {
        let params = SignalParams {
            frequency: 300.0,
            shape: WaveShape::Triangle,
            rectification: Rectification::Half,
            amplitude_positive: 1.0,
            ..SignalParams::default()
        };
        let samples = pull_samples(&mut producer_with(params), 2000);
        assert!(samples.iter().all(|&s| s >= 0));
        assert!(samples.iter().any(|&s| s > 30000));
    }

    #[test]
    fn test_full_scale_square_stays_in_range() {
        let params = SignalParams {
            frequency: 100.0,
            shape: WaveShape::Square,
            amplitude_positive: 1.0,
            ..SignalParams::default()
        };
        let samples = pull_samples(&mut producer_with(params), 1000);
        assert!(samples.iter().all(|&s| s == 32767 || s == -32767));
    }

    #[test]
    fn test_frequency_change_keeps_phase() {
        let store = ParameterStore::default();
        let mut producer = SampleProducer::new(store.clone(), SAMPLE_RATE);
        let _ = producer.pull(300);
        store.set_frequency_text("880").unwrap();
        let _ = producer.pull(10);
        assert_eq!(producer.phase(), 310);
    }

    #[test]
    fn test_reads_new_parameters_on_next_block() {
        let store = ParameterStore::new(SignalParams {
            amplitude_positive: 1.0,
            ..SignalParams::default()
        });
        let mut producer = SampleProducer::new(store.clone(), SAMPLE_RATE);
        assert!(pull_samples(&mut producer, 100).iter().any(|&s| s != 0));

        store.set_amplitude_positive_percent(0);
        assert!(pull_samples(&mut producer, 100).iter().all(|&s| s == 0));
    }

    #[test]
    fn test_reset_rewinds_phase() {
        let mut producer = producer_with(SignalParams::default());
        let first = pull_samples(&mut producer, 50);
        producer.reset();
        assert_eq!(producer.phase(), 0);
        assert_eq!(pull_samples(&mut producer, 50), first);
    }

    #[test]
    fn test_producer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SampleProducer>();
    }
}
