//! Lead-acid / NiMH style constant-resistor charging.
//!
//! Two calculators: the charger resistor network for a chosen charge rate,
//! and the time to charge a battery at a given current.

use crate::units::format_resistance;

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

/// Forward drop assumed for the charge indicator LED.
const LED_DROP: f64 = 2.5;
/// Current through the charge indicator branch, in amps.
const LED_CURRENT: f64 = 0.093;
/// Trickle current is capacity / 200.
const TRICKLE_DIVISOR: f64 = 200.0;
/// Rates faster than C/10 count as quick charging.
const QUICK_CHARGE_RATE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargerDesign {
    /// Charge current in amps.
    pub current: f64,
    /// Series resistor in ohms.
    pub resistance: f64,
    /// Series resistor dissipation in watts.
    pub power: f64,
    /// Indicator LED resistor in ohms.
    pub led_resistance: f64,
    pub trickle_current: f64,
    pub trickle_resistance: f64,
    pub trickle_power: f64,
    /// Charge rate n is below 10 (faster than C/10).
    pub quick_charge: bool,
}

/// Size the charger for source `vs`, battery full voltage `vmax`, capacity
/// in Ah and a charge rate of C/`rate`.
pub fn design_charger(vs: f64, rate: f64, vmax: f64, capacity: f64) -> Result<ChargerDesign, CalcError> {
    if vs <= vmax {
        return Err(CalcError::OutOfRange(
            "Source voltage must exceed the battery voltage".to_string(),
        ));
    }

    let headroom = vs - vmax;
    let current = capacity / rate;
    let trickle_current = capacity / TRICKLE_DIVISOR;

    Ok(ChargerDesign {
        current,
        resistance: headroom / current,
        power: headroom * current,
        led_resistance: (vs - LED_DROP) / LED_CURRENT,
        trickle_current,
        trickle_resistance: headroom / trickle_current,
        trickle_power: headroom * trickle_current,
        quick_charge: rate < QUICK_CHARGE_RATE,
    })
}

/// Hours to charge `capacity` Ah at `current` A from `vs`, with
/// `efficiency` in percent.
pub fn charge_hours(vs: f64, current: f64, vfull: f64, capacity: f64, efficiency: f64) -> f64 {
    (capacity * vfull) / (vs * current * (efficiency / 100.0))
}

/// Format hours as `HH:MM`, truncating partial minutes.
pub fn format_hours_minutes(hours: f64) -> String {
    let whole = hours.trunc();
    let minutes = ((hours - whole) * 60.0).trunc();
    format!("{:02}:{:02}", whole as u64, minutes as u64)
}

#[derive(Default)]
pub struct BatteryChargeCalculator;

impl Calculator for BatteryChargeCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "power.battery_charge",
            name: "Battery Charger",
            category: CalculatorCategory::Power,
            description: "Series resistor, trickle resistor and indicator LED for a battery charger",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::number("vs", "Source voltage (Vs)", "V", "18"),
            FieldDefinition::number("rate", "Charge rate (1/n)", "", "10"),
            FieldDefinition::number("vmax", "Battery max voltage", "V", "14.4"),
            FieldDefinition::number("capacity", "Battery capacity", "Ah", "7"),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let d = design_charger(
            inputs.number("vs")?,
            inputs.positive("rate")?,
            inputs.number("vmax")?,
            inputs.positive("capacity")?,
        )?;

        let mut lines = vec![
            ResultLine::new("Charge current", format!("{:.3} A", d.current)),
            ResultLine::new("R1", format_resistance(d.resistance)),
            ResultLine::new("R1 power", format!("{:.2} W", d.power)),
            ResultLine::new("LED resistor", format_resistance(d.led_resistance)),
            ResultLine::new("Trickle current", format!("{:.1} mA", d.trickle_current * 1e3)),
            ResultLine::new("Trickle resistor", format_resistance(d.trickle_resistance)),
            ResultLine::new("Trickle power", format!("{:.3} W", d.trickle_power)),
        ];
        if d.quick_charge {
            lines.push(ResultLine::warning("Rate", "Quick charge"));
        }
        lines.push(ResultLine::warning("Note", "Never trickle charge lithium batteries"));
        Ok(lines)
    }
}

#[derive(Default)]
pub struct ChargeTimeCalculator;

impl Calculator for ChargeTimeCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "power.charge_time",
            name: "Charge Time",
            category: CalculatorCategory::Power,
            description: "Time to charge a battery at a given current and efficiency",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::number("vs", "Source voltage (Vs)", "V", "12"),
            FieldDefinition::number("current", "Charge current", "A", "1"),
            FieldDefinition::number("vfull", "Battery full voltage", "V", "12.6"),
            FieldDefinition::number("capacity", "Battery capacity", "Ah", "7"),
            FieldDefinition::number("efficiency", "Efficiency", "%", "85"),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let hours = charge_hours(
            inputs.positive("vs")?,
            inputs.positive("current")?,
            inputs.positive("vfull")?,
            inputs.positive("capacity")?,
            inputs.positive("efficiency")?,
        );
        Ok(vec![
            ResultLine::new("Charge time", format_hours_minutes(hours)),
            ResultLine::new("Hours", format!("{:.2} h", hours)),
        ])
    }
}
