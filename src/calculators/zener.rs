//! Zener shunt regulator: series resistor and dissipation.

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

/// Minimum zener current kept flowing at full load, in amps.
pub const MIN_ZENER_CURRENT: f64 = 0.005;

#[derive(Default)]
pub struct ZenerCalculator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZenerDesign {
    /// Series resistor in ohms.
    pub resistance: f64,
    /// Worst-case resistor dissipation in watts.
    pub resistor_power: f64,
    /// Worst-case zener dissipation (no load, maximum input) in watts.
    pub zener_power: f64,
}

/// Design for nominal input `vin`, zener voltage `vz`, load current
/// `load_ma` (mA) and highest expected input `vin_max`.
pub fn design(vin: f64, vz: f64, load_ma: f64, vin_max: Option<f64>) -> Result<ZenerDesign, CalcError> {
    let vin_max = vin_max.unwrap_or(vin);
    if vin <= vz {
        return Err(CalcError::OutOfRange("Vi must be greater than Vz".to_string()));
    }
    if vin_max < vin {
        return Err(CalcError::OutOfRange("Vi max cannot be below Vi".to_string()));
    }
    if load_ma < 0.0 {
        return Err(CalcError::OutOfRange("Load current cannot be negative".to_string()));
    }

    let total_current = load_ma / 1000.0 + MIN_ZENER_CURRENT;
    let resistance = (vin - vz) / total_current;
    let resistor_power = (vin_max - vz).powi(2) / resistance;
    let zener_max_current = (vin_max - vz) / resistance;

    Ok(ZenerDesign {
        resistance,
        resistor_power,
        zener_power: vz * zener_max_current,
    })
}

impl Calculator for ZenerCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "power.zener",
            name: "Zener Regulator",
            category: CalculatorCategory::Power,
            description: "Series resistor and power ratings for a zener shunt regulator",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::number("vin", "Input voltage (Vi)", "V", "12"),
            FieldDefinition::number("vz", "Zener voltage (Vz)", "V", "5.1"),
            FieldDefinition::number("il", "Load current (IL)", "mA", "20"),
            FieldDefinition::number("vimax", "Max input voltage", "V", "").optional(),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let d = design(
            inputs.number("vin")?,
            inputs.number("vz")?,
            inputs.number("il")?,
            inputs.optional("vimax")?,
        )?;
        Ok(vec![
            ResultLine::new("Resistor (R)", format!("{:.2} Ω", d.resistance)),
            ResultLine::new("Resistor power (Pr)", format!("{:.2} W", d.resistor_power)),
            ResultLine::new("Zener power (Pz)", format!("{:.2} W", d.zener_power)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design() {
        // (12 - 5.1) / 25 mA = 276 Ω
        let d = design(12.0, 5.1, 20.0, None).unwrap();
        assert!((d.resistance - 276.0).abs() < 1e-9);
        assert!((d.resistor_power - 6.9 * 6.9 / 276.0).abs() < 1e-9);
        assert!((d.zener_power - 5.1 * 0.025).abs() < 1e-9);
    }

    #[test]
    fn test_max_input_raises_dissipation() {
        let nominal = design(12.0, 5.1, 20.0, None).unwrap();
        let ripple = design(12.0, 5.1, 20.0, Some(14.0)).unwrap();
        assert_eq!(nominal.resistance, ripple.resistance);
        assert!(ripple.resistor_power > nominal.resistor_power);
        assert!(ripple.zener_power > nominal.zener_power);
    }

    #[test]
    fn test_invalid_voltages() {
        assert!(design(5.0, 5.1, 20.0, None).is_err());
        assert!(design(5.1, 5.1, 20.0, None).is_err());
        assert!(design(12.0, 5.1, 20.0, Some(11.0)).is_err());
    }

    #[test]
    fn test_form() {
        let calc = ZenerCalculator;
        let lines = calc.evaluate(&calc.default_values()).unwrap();
        assert_eq!(lines[0].value, "276.00 Ω");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].value.ends_with(" W"));
    }
}
