//! Waveform model.
//!
//! A stateless mapping from an angular position to an instantaneous signal
//! value in [-1, 1]. Both the audio producer and the preview renderer sample
//! the same model, each with its own notion of position.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Waveform shapes offered by the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveShape {
    #[default]
    Sine,
    Square,
    Triangle,
}

impl WaveShape {
    /// Get the display name for this shape.
    pub fn name(&self) -> &'static str {
        match self {
            WaveShape::Sine => "Sine",
            WaveShape::Square => "Square",
            WaveShape::Triangle => "Triangle",
        }
    }

    /// Get all shapes, in selector order.
    pub fn all() -> &'static [WaveShape] {
        &[WaveShape::Sine, WaveShape::Square, WaveShape::Triangle]
    }
}

/// Rectification applied after shaping, before amplitude scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rectification {
    /// Waveform passes unchanged.
    #[default]
    Full,
    /// Negative excursions are clipped to zero.
    Half,
}

impl Rectification {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Rectification::Full => "Full",
            Rectification::Half => "Half",
        }
    }

    /// Get all modes, in selector order.
    pub fn all() -> &'static [Rectification] {
        &[Rectification::Full, Rectification::Half]
    }
}

/// Evaluate the waveform at `position` radians.
///
/// The period is 2π for every shape. `duty_cycle` only matters for
/// [`WaveShape::Square`]; values outside (0, 1) degrade to a constant level
/// rather than failing.
pub fn evaluate(
    position: f64,
    shape: WaveShape,
    duty_cycle: f64,
    rectification: Rectification,
) -> f64 {
    let value = match shape {
        WaveShape::Sine => position.sin(),
        WaveShape::Square => {
            if position.rem_euclid(TAU) < TAU * duty_cycle {
                1.0
            } else {
                -1.0
            }
        }
        WaveShape::Triangle => {
            let t = position / TAU;
            2.0 * (2.0 * (t - (t + 0.5).floor())).abs() - 1.0
        }
    };

    match rectification {
        Rectification::Full => value,
        Rectification::Half => value.max(0.0),
    }
}
