//! 555 astable multivibrator.
//!
//! f = 1.44 / ((R1 + 2 R2) C). Leave one of the four fields blank and it is
//! solved from the other three.

use crate::units::{format_capacitance, format_frequency, format_resistance, format_seconds};

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

const FREQUENCY_CONSTANT: f64 = 1.44;
/// ln(2), the charge/discharge time constant factor.
const LN2: f64 = std::f64::consts::LN_2;

const UNKNOWNS: &str = "R1, R2, C, f";

#[derive(Default)]
pub struct Timer555Calculator;

/// The four quantities of an astable circuit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AstableCircuit {
    pub r1: f64,
    pub r2: f64,
    pub c: f64,
    pub frequency: f64,
}

impl AstableCircuit {
    /// Time the output spends high, in seconds.
    pub fn high_time(&self) -> f64 {
        LN2 * (self.r1 + self.r2) * self.c
    }

    /// Time the output spends low, in seconds.
    pub fn low_time(&self) -> f64 {
        LN2 * self.r2 * self.c
    }

    /// High time as a fraction of the period.
    pub fn duty_cycle(&self) -> f64 {
        (self.r1 + self.r2) / (self.r1 + 2.0 * self.r2)
    }
}

/// Solve for whichever of the four values is `None`.
pub fn solve(
    r1: Option<f64>,
    r2: Option<f64>,
    c: Option<f64>,
    frequency: Option<f64>,
) -> Result<AstableCircuit, CalcError> {
    let circuit = match (r1, r2, c, frequency) {
        (Some(r1), Some(r2), Some(c), None) => AstableCircuit {
            r1,
            r2,
            c,
            frequency: FREQUENCY_CONSTANT / ((r1 + 2.0 * r2) * c),
        },
        (Some(r1), Some(r2), None, Some(f)) => AstableCircuit {
            r1,
            r2,
            c: FREQUENCY_CONSTANT / ((r1 + 2.0 * r2) * f),
            frequency: f,
        },
        (Some(r1), None, Some(c), Some(f)) => AstableCircuit {
            r1,
            r2: (FREQUENCY_CONSTANT / (f * c) - r1) / 2.0,
            c,
            frequency: f,
        },
        (None, Some(r2), Some(c), Some(f)) => AstableCircuit {
            r1: FREQUENCY_CONSTANT / (f * c) - 2.0 * r2,
            r2,
            c,
            frequency: f,
        },
        _ => return Err(CalcError::Underdetermined(UNKNOWNS)),
    };

    let values = [circuit.r1, circuit.r2, circuit.c, circuit.frequency];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CalcError::OutOfRange("Division by zero, check the values".to_string()));
    }
    if values.iter().any(|&v| v < 0.0) {
        return Err(CalcError::OutOfRange(
            "No positive solution for these values".to_string(),
        ));
    }
    Ok(circuit)
}

impl Calculator for Timer555Calculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "timing.555",
            name: "555 Astable",
            category: CalculatorCategory::Timing,
            description: "Frequency or component values for a 555 astable oscillator",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::scaled("r1", "R1", "Ω", "1k").optional(),
            FieldDefinition::scaled("r2", "R2", "Ω", "10k").optional(),
            FieldDefinition::scaled("c", "C", "F", "10u").optional(),
            FieldDefinition::scaled("f", "Frequency", "Hz", "").optional(),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let circuit = solve(
            inputs.optional("r1")?,
            inputs.optional("r2")?,
            inputs.optional("c")?,
            inputs.optional("f")?,
        )?;

        Ok(vec![
            ResultLine::new("R1", format_resistance(circuit.r1)),
            ResultLine::new("R2", format_resistance(circuit.r2)),
            ResultLine::new("C", format_capacitance(circuit.c)),
            ResultLine::new("Frequency", format_frequency(circuit.frequency)),
            ResultLine::new("High time", format_seconds(circuit.high_time())),
            ResultLine::new("Low time", format_seconds(circuit.low_time())),
            ResultLine::new("Duty cycle", format!("{:.1} %", circuit.duty_cycle() * 100.0)),
        ])
    }
}
