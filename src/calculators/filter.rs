//! First-order RC low/high-pass filter, optionally followed by a
//! non-inverting op-amp stage.

use std::f64::consts::PI;

use crate::units::{format_frequency, format_seconds};

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

const RESPONSES: &[&str] = &["Low pass", "High pass"];
const TOPOLOGIES: &[&str] = &["Passive", "Active"];

/// -3 dB frequency of an RC section.
pub fn cutoff_frequency(r: f64, c: f64) -> f64 {
    1.0 / (2.0 * PI * r * c)
}

/// Gain of a non-inverting amplifier, as a ratio and in dB.
pub fn non_inverting_gain(rf: f64, rin: f64) -> (f64, f64) {
    let av = 1.0 + rf / rin;
    let db = if av > 0.0 { 20.0 * av.log10() } else { 0.0 };
    (av, db)
}

#[derive(Default)]
pub struct FilterCalculator;

impl Calculator for FilterCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "passive.rc_filter",
            name: "RC Filter",
            category: CalculatorCategory::Passive,
            description: "Cut-off frequency and active-stage gain of an RC filter",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::choice("response", "Response", RESPONSES),
            FieldDefinition::choice("topology", "Topology", TOPOLOGIES),
            FieldDefinition::scaled("r", "R", "Ω", "10k"),
            FieldDefinition::scaled("c", "C", "F", "100n"),
            FieldDefinition::scaled("rf", "Rf", "Ω", "").optional(),
            FieldDefinition::scaled("rin", "Rin", "Ω", "").optional(),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let r = inputs.positive("r")?;
        let c = inputs.positive("c")?;
        let fc = cutoff_frequency(r, c);

        let mut lines = vec![
            ResultLine::new(format!("Cut-off ({})", inputs.choice("response")), format_frequency(fc)),
            ResultLine::new("Time constant", format_seconds(r * c)),
        ];

        if inputs.choice("topology") == TOPOLOGIES[1] {
            match (inputs.optional("rf")?, inputs.optional("rin")?) {
                (Some(rf), Some(rin)) if rin > 0.0 => {
                    let (av, db) = non_inverting_gain(rf, rin);
                    lines.push(ResultLine::new("Voltage gain", format!("{:.2} ({:.2} dB)", av, db)));
                }
                (Some(_), Some(_)) => return Err(CalcError::NotPositive("Rin")),
                _ => lines.push(ResultLine::warning("Voltage gain", "Missing Rf/Rin")),
            }
        } else {
            lines.push(ResultLine::new("Voltage gain", "Passive (no gain)"));
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(values: &[&str]) -> Result<Vec<ResultLine>, CalcError> {
        let values: Vec<String> = values.iter().map(|s| s.to_string()).collect();
        FilterCalculator.evaluate(&values)
    }

    #[test]
    fn test_cutoff_frequency() {
        let fc = cutoff_frequency(10_000.0, 100e-9);
        assert!((fc - 159.154_943).abs() < 1e-3);
    }

    #[test]
    fn test_gain() {
        let (av, db) = non_inverting_gain(9000.0, 1000.0);
        assert_eq!(av, 10.0);
        assert!((db - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_passive_form() {
        let lines = run(&["Low pass", "Passive", "10k", "100n", "", ""]).unwrap();
        assert_eq!(lines[0].label, "Cut-off (Low pass)");
        assert_eq!(lines[0].value, "159.15 Hz");
        assert_eq!(lines[2].value, "Passive (no gain)");
    }

    #[test]
    fn test_active_form() {
        let lines = run(&["High pass", "Active", "1k", "1u", "9k", "1k"]).unwrap();
        assert_eq!(lines[0].value, "159.15 Hz");
        assert_eq!(lines[2].value, "10.00 (20.00 dB)");

        let lines = run(&["High pass", "Active", "1k", "1u", "", ""]).unwrap();
        assert!(lines[2].warning);
    }

    #[test]
    fn test_requires_positive_components() {
        assert_eq!(
            run(&["Low pass", "Passive", "0", "100n", "", ""]),
            Err(CalcError::NotPositive("R"))
        );
        assert_eq!(
            run(&["Low pass", "Passive", "10k", "", "", ""]),
            Err(CalcError::Missing("C"))
        );
    }
}
