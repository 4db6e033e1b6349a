//! LM317 adjustable regulator.
//!
//! Vo = 1.25 V * (1 + R2 / R1). The regulator needs about 1.5 V of headroom
//! between input and output.

use crate::units::format_resistance;

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};
use super::standard_values::nearest_e24;

/// Internal reference voltage.
pub const REFERENCE_VOLTAGE: f64 = 1.25;
/// Minimum input-output differential.
pub const DROPOUT: f64 = 1.5;

const MODES: &[&str] = &["Output voltage", "R2"];

#[derive(Default)]
pub struct Lm317Calculator;

/// Output voltage for a resistor pair.
pub fn output_voltage(r1: f64, r2: f64) -> f64 {
    REFERENCE_VOLTAGE * (1.0 + r2 / r1)
}

/// R2 needed for a target output voltage.
pub fn required_r2(r1: f64, vout: f64) -> f64 {
    r1 * (vout / REFERENCE_VOLTAGE - 1.0)
}

fn check_headroom(vin: f64, vout: f64) -> Result<(), CalcError> {
    if vout > vin - DROPOUT {
        Err(CalcError::OutOfRange(format!(
            "Vi ({} V) is insufficient for {:.2} V output",
            vin, vout
        )))
    } else {
        Ok(())
    }
}

impl Calculator for Lm317Calculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "power.lm317",
            name: "LM317 Regulator",
            category: CalculatorCategory::Power,
            description: "Output voltage or R2 for the LM317 adjustable regulator",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::choice("mode", "Solve for", MODES),
            FieldDefinition::number("vin", "Input voltage (Vi)", "V", "12"),
            FieldDefinition::scaled("r1", "R1", "Ω", "240"),
            FieldDefinition::scaled("r2", "R2", "Ω", "720").optional(),
            FieldDefinition::number("vout", "Output voltage (Vo)", "V", "").optional(),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let vin = inputs.number("vin")?;
        let r1 = inputs.positive("r1")?;

        if inputs.choice("mode") == MODES[1] {
            let vout = inputs.number("vout")?;
            check_headroom(vin, vout)?;
            if vout < REFERENCE_VOLTAGE {
                return Err(CalcError::OutOfRange(format!(
                    "Minimum output is {} V",
                    REFERENCE_VOLTAGE
                )));
            }
            let r2 = required_r2(r1, vout);
            Ok(vec![
                ResultLine::new("R2", format!("{:.1} Ω", r2)),
                ResultLine::new("Nearest E24", format_resistance(nearest_e24(r2))),
            ])
        } else {
            let r2 = inputs.number("r2")?;
            if r2 < 0.0 {
                return Err(CalcError::OutOfRange("R2 cannot be negative".to_string()));
            }
            let vout = output_voltage(r1, r2);
            check_headroom(vin, vout)?;
            Ok(vec![
                ResultLine::new("Output voltage", format!("{:.2} V", vout)),
                ResultLine::new("Headroom", format!("{:.2} V", vin - vout)),
            ])
        }
    }
}
