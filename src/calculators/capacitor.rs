//! Ceramic capacitor markings and µF/nF/pF conversion.

use crate::units::format_compact;

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

const UNITS: &[&str] = &["uF", "nF", "pF"];

/// Tolerance for a ceramic code letter.
pub fn tolerance_for(letter: char) -> Option<&'static str> {
    match letter {
        'F' => Some("±1%"),
        'G' => Some("±2%"),
        'J' => Some("±5%"),
        'K' => Some("±10%"),
        'M' => Some("±20%"),
        _ => None,
    }
}

/// A decoded `NNX[T]` marking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CeramicCode {
    pub picofarads: f64,
    pub tolerance: Option<&'static str>,
}

/// Decode a marking such as `104J`, `222` or `47`.
///
/// Three or more digits read as two significant digits and a power of ten in
/// pF; one or two digits are the value in pF.
pub fn decode_ceramic(code: &str) -> Result<CeramicCode, CalcError> {
    let code = code.trim().to_uppercase();
    let invalid = || CalcError::InvalidCode(code.clone());

    let (digits, tolerance) = match code.chars().last() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            let tolerance = tolerance_for(letter).ok_or_else(invalid)?;
            (&code[..code.len() - 1], Some(tolerance))
        }
        Some(_) => (code.as_str(), None),
        None => return Err(invalid()),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let picofarads = if digits.len() >= 3 {
        let base: f64 = digits[..2].parse().map_err(|_| invalid())?;
        let exponent: i32 = digits[2..].parse().map_err(|_| invalid())?;
        if exponent > 9 {
            return Err(CalcError::OutOfRange(format!("Multiplier 10^{} is too large", exponent)));
        }
        base * 10f64.powi(exponent)
    } else {
        digits.parse().map_err(|_| invalid())?
    };

    Ok(CeramicCode { picofarads, tolerance })
}

/// A capacitance expressed in all three units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capacitance {
    pub microfarads: f64,
    pub nanofarads: f64,
    pub picofarads: f64,
}

impl Capacitance {
    pub fn from_picofarads(pf: f64) -> Self {
        Self {
            microfarads: pf / 1e6,
            nanofarads: pf / 1e3,
            picofarads: pf,
        }
    }

    /// Convert `value` given in `unit` ("uF", "nF" or "pF", any case).
    pub fn from_unit(value: f64, unit: &str) -> Result<Self, CalcError> {
        let pf = match unit.trim().to_lowercase().as_str() {
            "uf" | "µf" => value * 1e6,
            "nf" => value * 1e3,
            "pf" => value,
            other => return Err(CalcError::InvalidCode(other.to_string())),
        };
        Ok(Self::from_picofarads(pf))
    }
}

#[derive(Default)]
pub struct CapacitorCalculator;

impl Calculator for CapacitorCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "passive.capacitor",
            name: "Capacitor Codes",
            category: CalculatorCategory::Passive,
            description: "Decode ceramic capacitor markings and convert between units",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::text("code", "Ceramic code", "104J"),
            FieldDefinition::number("value", "Convert value", "", "").optional(),
            FieldDefinition::choice("unit", "From unit", UNITS),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let mut lines = Vec::new();

        if !inputs.is_blank("code") {
            let decoded = decode_ceramic(inputs.text("code"))?;
            let c = Capacitance::from_picofarads(decoded.picofarads);
            lines.push(ResultLine::new(
                "Code value",
                format!(
                    "{} pF | {} nF | {:.6} µF",
                    format_compact(c.picofarads),
                    format_compact(c.nanofarads),
                    c.microfarads
                ),
            ));
            if let Some(tolerance) = decoded.tolerance {
                lines.push(ResultLine::new("Tolerance", tolerance));
            }
        }

        if let Some(value) = inputs.optional("value")? {
            let unit = inputs.choice("unit");
            let c = Capacitance::from_unit(value, unit)?;
            let converted = match unit {
                "uF" => format!("{} nF / {} pF", format_compact(c.nanofarads), format_compact(c.picofarads)),
                "nF" => format!("{:.6} µF / {} pF", c.microfarads, format_compact(c.picofarads)),
                _ => format!("{:.9} µF / {:.6} nF", c.microfarads, c.nanofarads),
            };
            lines.push(ResultLine::new("Converted", converted));
        }

        if lines.is_empty() {
            return Err(CalcError::Missing("Ceramic code"));
        }
        Ok(lines)
    }
}
