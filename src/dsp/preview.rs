//! Live waveform preview geometry.
//!
//! The preview is cosmetic: it runs on its own animation phase, advanced once
//! per redraw tick, and maps pixel columns to waveform position with a
//! screen-friendly scale rather than the physical one used for audio.

use super::params::{ParameterStore, SignalParams};
use super::waveform::{evaluate, Rectification, WaveShape};

/// Default phase advance per redraw tick.
pub const DEFAULT_PHASE_STEP: f64 = 0.2;

/// Pixel columns per preview unit before frequency scaling.
const PIXELS_PER_UNIT: f64 = 50.0;

/// Fraction of the viewport height used for a full-amplitude excursion.
const HEIGHT_DIVISOR: f64 = 2.3;

/// Amplitude of the dual-trace reference sine.
pub const REFERENCE_AMPLITUDE: f64 = 0.05;

/// One rendered frame: polylines in viewport pixel coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreviewFrame {
    /// The generator's waveform.
    pub primary: Vec<[f32; 2]>,
    /// Fixed low-amplitude reference sine, present in dual-trace mode.
    pub reference: Option<Vec<[f32; 2]>>,
}

impl PreviewFrame {
    /// Whether the frame holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Computes preview polylines from the shared parameters.
pub struct PreviewRenderer {
    /// Animation phase, independent of the audio sample count.
    phase: f64,
    /// Phase advance per tick.
    phase_step: f64,
    /// Parameter source.
    params: ParameterStore,
}

impl PreviewRenderer {
    /// Creates a renderer with the default phase step.
    pub fn new(params: ParameterStore) -> Self {
        Self::with_phase_step(params, DEFAULT_PHASE_STEP)
    }

    /// Creates a renderer advancing by `phase_step` per tick.
    pub fn with_phase_step(params: ParameterStore, phase_step: f64) -> Self {
        Self {
            phase: 0.0,
            phase_step,
            params,
        }
    }

    /// Current animation phase.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Render one redraw tick.
    ///
    /// Advances the animation phase once (unless frozen), then samples the
    /// waveform at every pixel column of a `width` x `height` viewport.
    pub fn render_frame(&mut self, width: usize, height: f32) -> PreviewFrame {
        let params = self.params.snapshot();
        if !params.frozen {
            self.phase += self.phase_step;
        }

        if width == 0 {
            return PreviewFrame::default();
        }

        let height = f64::from(height.max(0.0));
        let primary = trace(&params, width, height, self.phase);
        let reference = params.dual_trace.then(|| {
            let reference = SignalParams {
                shape: WaveShape::Sine,
                rectification: Rectification::Full,
                amplitude_positive: REFERENCE_AMPLITUDE,
                amplitude_negative: REFERENCE_AMPLITUDE,
                asymmetric: false,
                ..params
            };
            trace(&reference, width, height, self.phase)
        });

        PreviewFrame { primary, reference }
    }
}

/// Horizontal scale: higher frequency and timebase compress more cycles
/// into the same width.
fn frequency_scale(params: &SignalParams) -> f64 {
    (params.frequency.max(1.0) / 100.0) * (f64::from(params.timebase) / 10.0)
}

/// Vertical scale for an amplitude. The square root keeps small amplitudes
/// visible while preserving their order.
fn vertical_scale(height: f64, amplitude: f64) -> f64 {
    (height / HEIGHT_DIVISOR) * amplitude.clamp(0.0, 1.0).sqrt()
}

fn trace(params: &SignalParams, width: usize, height: f64, phase: f64) -> Vec<[f32; 2]> {
    let mid_y = height / 2.0;
    let scale = frequency_scale(params);
    let positive = vertical_scale(height, params.amplitude_positive);
    let negative = vertical_scale(height, params.amplitude_negative);

    (0..width)
        .map(|x| {
            let position = (x as f64 / PIXELS_PER_UNIT) * scale + phase;
            let value = evaluate(position, params.shape, params.duty_cycle, params.rectification);
            let s = if params.asymmetric && value < 0.0 { negative } else { positive };
            [x as f32, (mid_y - value * s) as f32]
        })
        .collect()
}

/// Holds or releases the preview animation. Audio is unaffected.
#[derive(Clone, Debug)]
pub struct FreezeController {
    params: ParameterStore,
}

impl FreezeController {
    pub fn new(params: ParameterStore) -> Self {
        Self { params }
    }

    pub fn is_frozen(&self) -> bool {
        self.params.snapshot().frozen
    }

    pub fn set_frozen(&self, frozen: bool) {
        self.params.set_frozen(frozen);
    }

    /// Flip the freeze state and return the new one.
    pub fn toggle(&self) -> bool {
        let mut frozen = false;
        self.params.update(|p| {
            p.frozen = !p.frozen;
            frozen = p.frozen;
        });
        frozen
    }
}
