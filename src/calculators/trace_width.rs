//! PCB trace width from current capacity (IPC-2221, external layers).

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

/// IPC-2221 external-layer constants: I = k * dT^b * A^c.
const K_EXTERNAL: f64 = 0.048;
const B_EXPONENT: f64 = 0.44;
const C_EXPONENT: f64 = 0.725;

/// Copper thickness per oz/ft², in mils.
const MILS_PER_OZ: f64 = 1.37;
const MM_PER_MIL: f64 = 0.0254;
/// Resistivity of copper at 20 °C, in Ω·m.
pub const COPPER_RESISTIVITY: f64 = 1.724e-8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trace {
    /// Required cross-section in square mils.
    pub area_mils2: f64,
    pub width_mils: f64,
    pub width_mm: f64,
    /// Resistance over the given length, in ohms.
    pub resistance: f64,
    pub voltage_drop: f64,
    pub power_loss: f64,
}

/// Minimum width for `current` amps with a `temp_rise` °C rise on
/// `copper_oz` copper, and its losses over `length_mm`.
pub fn trace_for(current: f64, temp_rise: f64, copper_oz: f64, length_mm: f64) -> Trace {
    let area_mils2 = (current / (K_EXTERNAL * temp_rise.powf(B_EXPONENT))).powf(1.0 / C_EXPONENT);
    let thickness_mils = copper_oz * MILS_PER_OZ;
    let width_mils = area_mils2 / thickness_mils;
    let width_mm = width_mils * MM_PER_MIL;

    let area_m2 = (width_mm / 1000.0) * (thickness_mils * MM_PER_MIL / 1000.0);
    let resistance = COPPER_RESISTIVITY * (length_mm / 1000.0) / area_m2;

    Trace {
        area_mils2,
        width_mils,
        width_mm,
        resistance,
        voltage_drop: current * resistance,
        power_loss: current * current * resistance,
    }
}

#[derive(Default)]
pub struct TraceWidthCalculator;

impl Calculator for TraceWidthCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "pcb.trace_width",
            name: "Trace Width",
            category: CalculatorCategory::Pcb,
            description: "Minimum external trace width for a current and its losses",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::number("current", "Current", "A", "1.0"),
            FieldDefinition::number("rise", "Temperature rise", "°C", "10"),
            FieldDefinition::number("copper", "Copper weight", "oz/ft²", "1.0"),
            FieldDefinition::number("length", "Trace length", "mm", "50"),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let length = inputs.number("length")?;
        if length < 0.0 {
            return Err(CalcError::OutOfRange("Trace length cannot be negative".to_string()));
        }
        let t = trace_for(
            inputs.positive("current")?,
            inputs.positive("rise")?,
            inputs.positive("copper")?,
            length,
        );
        Ok(vec![
            ResultLine::new("Width", format!("{:.4} mm", t.width_mm)),
            ResultLine::new("Width (mils)", format!("{:.1} mil", t.width_mils)),
            ResultLine::new("Cross-section", format!("{:.1} mil²", t.area_mils2)),
            ResultLine::new("Resistance", format!("{:.4} Ω", t.resistance)),
            ResultLine::new("Voltage drop", format!("{:.4} V", t.voltage_drop)),
            ResultLine::new("Power loss", format!("{:.4} W", t.power_loss)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_amp_ten_degrees() {
        let t = trace_for(1.0, 10.0, 1.0, 50.0);
        // Published IPC-2221 charts give about 0.3 mm for 1 A at 10 °C on 1 oz.
        assert!(t.width_mm > 0.25 && t.width_mm < 0.35, "{}", t.width_mm);
        assert!((t.width_mils * 1.37 - t.area_mils2).abs() < 1e-9);
        assert!((t.voltage_drop - t.resistance).abs() < 1e-12);
    }

    #[test]
    fn test_more_current_needs_wider_trace() {
        let narrow = trace_for(1.0, 10.0, 1.0, 50.0);
        let wide = trace_for(3.0, 10.0, 1.0, 50.0);
        assert!(wide.width_mm > narrow.width_mm);
    }

    #[test]
    fn test_heavier_copper_is_narrower() {
        let one = trace_for(2.0, 10.0, 1.0, 50.0);
        let two = trace_for(2.0, 10.0, 2.0, 50.0);
        assert!((one.width_mm / two.width_mm - 2.0).abs() < 1e-9);
        assert!((one.area_mils2 - two.area_mils2).abs() < 1e-9);
    }

    #[test]
    fn test_resistance_scales_with_length() {
        let short = trace_for(1.0, 10.0, 1.0, 10.0);
        let long = trace_for(1.0, 10.0, 1.0, 100.0);
        assert!((long.resistance / short.resistance - 10.0).abs() < 1e-9);
        assert!((long.power_loss - long.resistance).abs() < 1e-12);
    }

    #[test]
    fn test_zero_current_rejected() {
        let values: Vec<String> = ["0", "10", "1", "50"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            TraceWidthCalculator.evaluate(&values),
            Err(CalcError::NotPositive("Current"))
        );
    }
}
