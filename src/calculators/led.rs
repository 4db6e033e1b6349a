//! Current-limiting resistor for LED strings.

use crate::units::format_resistance;

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};
use super::standard_values::nearest_e24;

const WIRING: &[&str] = &["Series", "Parallel"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wiring {
    /// All LEDs in one string through one resistor.
    Series,
    /// LEDs side by side, sharing one resistor.
    Parallel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedResistor {
    pub resistance: f64,
    pub power: f64,
    pub standard: f64,
    /// Double resistance, for half the current and longer LED life.
    pub long_life: f64,
    pub long_life_standard: f64,
}

/// Size the resistor for `count` LEDs with forward voltage `vf` at
/// `current_ma` each.
pub fn led_resistor(
    wiring: Wiring,
    vs: f64,
    vf: f64,
    count: u32,
    current_ma: f64,
) -> Result<LedResistor, CalcError> {
    let count = f64::from(count);
    let (drop, current) = match wiring {
        Wiring::Series => (vs - vf * count, current_ma / 1000.0),
        Wiring::Parallel => (vs - vf, current_ma * count / 1000.0),
    };
    if drop <= 0.0 {
        return Err(CalcError::OutOfRange(
            "Supply voltage must exceed the LED forward voltage".to_string(),
        ));
    }

    let resistance = drop / current;
    let long_life = resistance * 2.0;
    Ok(LedResistor {
        resistance,
        power: drop * current,
        standard: nearest_e24(resistance),
        long_life,
        long_life_standard: nearest_e24(long_life),
    })
}

#[derive(Default)]
pub struct LedCalculator;

impl Calculator for LedCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "passive.led",
            name: "LED Resistor",
            category: CalculatorCategory::Passive,
            description: "Series resistor for LEDs in series or parallel",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::choice("wiring", "Wiring", WIRING),
            FieldDefinition::number("vs", "Supply voltage", "V", "12"),
            FieldDefinition::number("vf", "LED forward voltage", "V", "2"),
            FieldDefinition::count("count", "Number of LEDs", "1"),
            FieldDefinition::number("if", "LED current", "mA", "20"),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let wiring = if inputs.choice("wiring") == WIRING[1] {
            Wiring::Parallel
        } else {
            Wiring::Series
        };
        let r = led_resistor(
            wiring,
            inputs.number("vs")?,
            inputs.number("vf")?,
            inputs.count("count")?,
            inputs.positive("if")?,
        )?;

        Ok(vec![
            ResultLine::new("Calculated resistance", format_resistance(r.resistance)),
            ResultLine::new("Nearest E24", format_resistance(r.standard)),
            ResultLine::new("Resistor power", format!("{:.3} W", r.power)),
            ResultLine::new("Long life", format_resistance(r.long_life)),
            ResultLine::new("Long life E24", format_resistance(r.long_life_standard)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series() {
        // (12 - 3 * 2) / 20 mA = 300 Ω
        let r = led_resistor(Wiring::Series, 12.0, 2.0, 3, 20.0).unwrap();
        assert!((r.resistance - 300.0).abs() < 1e-9);
        assert!((r.power - 0.12).abs() < 1e-12);
        assert_eq!(r.standard, 300.0);
        assert!((r.long_life - 600.0).abs() < 1e-9);
        assert_eq!(r.long_life_standard, 620.0);
    }

    #[test]
    fn test_parallel() {
        // (5 - 2) / (2 * 20 mA) = 75 Ω
        let r = led_resistor(Wiring::Parallel, 5.0, 2.0, 2, 20.0).unwrap();
        assert!((r.resistance - 75.0).abs() < 1e-9);
        assert_eq!(r.standard, 75.0);
    }

    #[test]
    fn test_insufficient_supply() {
        assert!(led_resistor(Wiring::Series, 5.0, 2.0, 3, 20.0).is_err());
        assert!(led_resistor(Wiring::Parallel, 2.0, 2.0, 1, 20.0).is_err());
    }

    #[test]
    fn test_form() {
        let calc = LedCalculator;
        let lines = calc.evaluate(&calc.default_values()).unwrap();
        assert_eq!(lines[0].value, "500.00 Ω");
        assert_eq!(lines[1].value, "510.00 Ω");
        assert_eq!(lines[2].value, "0.200 W");
    }

    #[test]
    fn test_count_must_be_whole() {
        let values: Vec<String> = ["Series", "12", "2", "1.5", "20"].iter().map(|s| s.to_string()).collect();
        assert!(matches!(
            LedCalculator.evaluate(&values),
            Err(CalcError::InvalidInput { field: "Number of LEDs", .. })
        ));
    }
}
