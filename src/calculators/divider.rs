//! Resistive voltage divider. Fill three of Vi, R1, R2, Vo to get the fourth.

use crate::units::{format_compact, format_resistance};

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

const UNKNOWNS: &str = "Vi, R1, R2, Vo";

#[derive(Default)]
pub struct DividerCalculator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Divider {
    pub vin: f64,
    pub r1: f64,
    pub r2: f64,
    pub vout: f64,
}

impl Divider {
    /// Current through the chain, in amps.
    pub fn current(&self) -> f64 {
        self.vin / (self.r1 + self.r2)
    }
}

fn division_by_zero() -> CalcError {
    CalcError::OutOfRange("Division by zero, check the values".to_string())
}

pub fn solve(
    vin: Option<f64>,
    r1: Option<f64>,
    r2: Option<f64>,
    vout: Option<f64>,
) -> Result<Divider, CalcError> {
    let divider = match (vin, r1, r2, vout) {
        (Some(vin), Some(r1), Some(r2), None) => {
            if r1 + r2 == 0.0 {
                return Err(division_by_zero());
            }
            Divider { vin, r1, r2, vout: vin * r2 / (r1 + r2) }
        }
        (Some(vin), Some(r1), None, Some(vout)) => {
            if vin == vout {
                return Err(division_by_zero());
            }
            Divider { vin, r1, r2: vout * r1 / (vin - vout), vout }
        }
        (Some(vin), None, Some(r2), Some(vout)) => {
            if vout == 0.0 {
                return Err(division_by_zero());
            }
            Divider { vin, r1: r2 * (vin - vout) / vout, r2, vout }
        }
        (None, Some(r1), Some(r2), Some(vout)) => {
            if r2 == 0.0 {
                return Err(division_by_zero());
            }
            Divider { vin: vout * (r1 + r2) / r2, r1, r2, vout }
        }
        _ => return Err(CalcError::Underdetermined(UNKNOWNS)),
    };

    if divider.r1 < 0.0 || divider.r2 < 0.0 {
        return Err(CalcError::OutOfRange(
            "Vo must lie between 0 and Vi".to_string(),
        ));
    }
    Ok(divider)
}

/// Integers print bare, anything else with two decimals.
fn format_result(value: f64) -> String {
    if value.fract() == 0.0 {
        format_compact(value)
    } else {
        format!("{:.2}", value)
    }
}

impl Calculator for DividerCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "power.divider",
            name: "Voltage Divider",
            category: CalculatorCategory::Power,
            description: "Solve a two-resistor divider for the missing value",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::scaled("vin", "Vi", "V", "12").optional(),
            FieldDefinition::scaled("r1", "R1", "Ω", "10k").optional(),
            FieldDefinition::scaled("r2", "R2", "Ω", "").optional(),
            FieldDefinition::scaled("vout", "Vo", "V", "5").optional(),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let d = solve(
            inputs.optional("vin")?,
            inputs.optional("r1")?,
            inputs.optional("r2")?,
            inputs.optional("vout")?,
        )?;

        let mut lines = vec![
            ResultLine::new("Vi", format!("{} V", format_result(d.vin))),
            ResultLine::new("R1", format_resistance(d.r1)),
            ResultLine::new("R2", format_resistance(d.r2)),
            ResultLine::new("Vo", format!("{} V", format_result(d.vout))),
        ];
        let current = d.current();
        if current.is_finite() {
            lines.push(ResultLine::new("Current", format!("{:.3} mA", current * 1e3)));
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_each_unknown() {
        let d = solve(Some(12.0), Some(10_000.0), Some(10_000.0), None).unwrap();
        assert_eq!(d.vout, 6.0);

        let d = solve(Some(12.0), Some(7000.0), None, Some(5.0)).unwrap();
        assert!((d.r2 - 5000.0).abs() < 1e-9);

        let d = solve(Some(12.0), None, Some(5000.0), Some(5.0)).unwrap();
        assert!((d.r1 - 7000.0).abs() < 1e-9);

        let d = solve(None, Some(7000.0), Some(5000.0), Some(5.0)).unwrap();
        assert!((d.vin - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            solve(Some(5.0), Some(1000.0), None, Some(5.0)),
            Err(CalcError::OutOfRange(_))
        ));
        assert!(solve(Some(5.0), None, Some(1000.0), Some(0.0)).is_err());
    }

    #[test]
    fn test_vout_above_vin_rejected() {
        assert!(solve(Some(5.0), Some(1000.0), None, Some(6.0)).is_err());
    }

    #[test]
    fn test_requires_three_values() {
        assert_eq!(
            solve(Some(5.0), None, None, Some(1.0)),
            Err(CalcError::Underdetermined(UNKNOWNS))
        );
    }

    #[test]
    fn test_form() {
        let values: Vec<String> = ["12", "10k", "10k", ""].iter().map(|s| s.to_string()).collect();
        let lines = DividerCalculator.evaluate(&values).unwrap();
        assert_eq!(lines[3].value, "6 V");
        assert_eq!(lines[4].value, "0.600 mA");
    }
}
