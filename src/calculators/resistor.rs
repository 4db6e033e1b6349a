//! Resistor color bands, both directions.

use crate::units::{format_compact, format_resistance_compact};

use super::calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, Inputs, ResultLine,
};

/// One entry of the color code table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandColor {
    pub name: &'static str,
    /// Value as a significant-digit band.
    pub digit: Option<u8>,
    /// Power of ten as a multiplier band.
    pub multiplier_exp: Option<i32>,
    /// Tolerance in percent.
    pub tolerance: Option<f64>,
}

const fn band(name: &'static str, digit: Option<u8>, multiplier_exp: Option<i32>, tolerance: Option<f64>) -> BandColor {
    BandColor {
        name,
        digit,
        multiplier_exp,
        tolerance,
    }
}

pub const COLORS: [BandColor; 12] = [
    band("Black", Some(0), Some(0), None),
    band("Brown", Some(1), Some(1), Some(1.0)),
    band("Red", Some(2), Some(2), Some(2.0)),
    band("Orange", Some(3), Some(3), None),
    band("Yellow", Some(4), Some(4), None),
    band("Green", Some(5), Some(5), Some(0.5)),
    band("Blue", Some(6), Some(6), Some(0.25)),
    band("Violet", Some(7), Some(7), Some(0.1)),
    band("Grey", Some(8), None, Some(0.05)),
    band("White", Some(9), None, None),
    band("Gold", None, Some(-1), Some(5.0)),
    band("Silver", None, Some(-2), Some(10.0)),
];

const BAND_COUNTS: &[&str] = &["4-band", "5-band"];
const DIGIT_COLORS: &[&str] = &[
    "Black", "Brown", "Red", "Orange", "Yellow", "Green", "Blue", "Violet", "Grey", "White",
];
const MULTIPLIER_COLORS: &[&str] = &[
    "Black", "Brown", "Red", "Orange", "Yellow", "Green", "Blue", "Violet", "Gold", "Silver",
];
const TOLERANCE_COLORS: &[&str] = &["Brown", "Red", "Green", "Blue", "Violet", "Grey", "Gold", "Silver"];

/// Look a color up by name, ignoring case.
pub fn color(name: &str) -> Option<&'static BandColor> {
    let name = name.trim();
    COLORS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Number of significant-digit bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BandCount {
    Four,
    Five,
}

impl BandCount {
    pub fn digits(&self) -> usize {
        match self {
            BandCount::Four => 2,
            BandCount::Five => 3,
        }
    }
}

/// Resistance read from the bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandValue {
    pub ohms: f64,
    pub tolerance: f64,
}

/// Decode significant-digit bands plus multiplier and tolerance bands.
pub fn decode_bands(digits: &[&str], multiplier: &str, tolerance: &str) -> Result<BandValue, CalcError> {
    let mut significant = 0u32;
    for name in digits {
        let digit = color(name)
            .and_then(|c| c.digit)
            .ok_or_else(|| CalcError::InvalidCode(format!("{} is not a digit band", name)))?;
        significant = significant * 10 + u32::from(digit);
    }
    let exponent = color(multiplier)
        .and_then(|c| c.multiplier_exp)
        .ok_or_else(|| CalcError::InvalidCode(format!("{} is not a multiplier band", multiplier)))?;
    let tolerance = color(tolerance)
        .and_then(|c| c.tolerance)
        .ok_or_else(|| CalcError::InvalidCode(format!("{} is not a tolerance band", tolerance)))?;

    Ok(BandValue {
        ohms: f64::from(significant) * 10f64.powi(exponent),
        tolerance,
    })
}

/// Parse a resistance marking: `470`, `4.7k`, `4k7`, `2R2`, `1M`.
///
/// A letter between digits stands in for the decimal point.
pub fn parse_marking(text: &str) -> Result<f64, CalcError> {
    let invalid = || CalcError::InvalidCode(text.trim().to_string());
    let mut cleaned: String = text
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    for unit in ["OHMS", "OHM", "Ω"] {
        if let Some(stripped) = cleaned.strip_suffix(unit) {
            cleaned = stripped.to_string();
            break;
        }
    }

    let letter = cleaned
        .char_indices()
        .find(|(_, c)| matches!(c, 'R' | 'K' | 'M'));

    let value = match letter {
        None => cleaned.parse::<f64>().map_err(|_| invalid())?,
        Some((pos, letter)) => {
            let multiplier = match letter {
                'K' => 1e3,
                'M' => 1e6,
                _ => 1.0,
            };
            let before = &cleaned[..pos];
            let after = &cleaned[pos + 1..];
            let number = if after.is_empty() {
                before.to_string()
            } else {
                if before.contains('.') || !after.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let whole = if before.is_empty() { "0" } else { before };
                format!("{}.{}", whole, after)
            };
            number.parse::<f64>().map_err(|_| invalid())? * multiplier
        }
    };

    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Color bands (significant digits then multiplier) for a resistance.
///
/// The value is rounded to the available significant digits.
pub fn encode_value(ohms: f64, bands: BandCount) -> Result<Vec<&'static str>, CalcError> {
    if !(ohms > 0.0) || !ohms.is_finite() {
        return Err(CalcError::NotPositive("Value"));
    }

    let lower = 10f64.powi(bands.digits() as i32 - 1);
    let upper = lower * 10.0;

    let mut mantissa = ohms;
    let mut exponent = 0i32;
    while mantissa >= upper {
        mantissa /= 10.0;
        exponent += 1;
    }
    while mantissa < lower {
        mantissa *= 10.0;
        exponent -= 1;
    }
    let mut rounded = mantissa.round();
    if rounded >= upper {
        rounded /= 10.0;
        exponent += 1;
    }

    let multiplier = COLORS
        .iter()
        .find(|c| c.multiplier_exp == Some(exponent))
        .ok_or_else(|| {
            CalcError::OutOfRange(format!(
                "{} cannot be shown with {} bands",
                format_resistance_compact(ohms),
                bands.digits() + 2
            ))
        })?;

    let digits = format!("{}", rounded as u32);
    let mut names = Vec::with_capacity(bands.digits() + 1);
    for d in digits.chars() {
        let value = d.to_digit(10).ok_or_else(|| CalcError::InvalidCode(digits.clone()))?;
        let band = COLORS
            .iter()
            .find(|c| c.digit.map(u32::from) == Some(value))
            .ok_or_else(|| CalcError::InvalidCode(digits.clone()))?;
        names.push(band.name);
    }
    names.push(multiplier.name);
    Ok(names)
}

#[derive(Default)]
pub struct ResistorColorCalculator;

impl Calculator for ResistorColorCalculator {
    fn info(&self) -> &CalculatorInfo {
        static INFO: CalculatorInfo = CalculatorInfo {
            id: "passive.resistor_colors",
            name: "Resistor Color Code",
            category: CalculatorCategory::Passive,
            description: "Read 4- and 5-band resistor colors, or find the bands for a value",
        };
        &INFO
    }

    fn fields(&self) -> &[FieldDefinition] {
        const FIELDS: &[FieldDefinition] = &[
            FieldDefinition::choice("bands", "Bands", BAND_COUNTS),
            FieldDefinition::choice("band1", "Band 1", DIGIT_COLORS).with_default("Brown"),
            FieldDefinition::choice("band2", "Band 2", DIGIT_COLORS),
            FieldDefinition::choice("band3", "Band 3 (5-band)", DIGIT_COLORS),
            FieldDefinition::choice("multiplier", "Multiplier", MULTIPLIER_COLORS).with_default("Red"),
            FieldDefinition::choice("tolerance", "Tolerance", TOLERANCE_COLORS).with_default("Gold"),
            FieldDefinition::text("value", "Value to encode", "4k7"),
        ];
        FIELDS
    }

    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
        let bands = if inputs.choice("bands") == BAND_COUNTS[1] {
            BandCount::Five
        } else {
            BandCount::Four
        };

        let digit_ids: &[&str] = match bands {
            BandCount::Four => &["band1", "band2"],
            BandCount::Five => &["band1", "band2", "band3"],
        };
        let digits: Vec<&str> = digit_ids.iter().map(|id| inputs.choice(id)).collect();
        let decoded = decode_bands(&digits, inputs.choice("multiplier"), inputs.choice("tolerance"))?;

        let spread = decoded.ohms * decoded.tolerance / 100.0;
        let mut lines = vec![
            ResultLine::new("Value", format_resistance_compact(decoded.ohms)),
            ResultLine::new("Tolerance", format!("±{}%", format_compact(decoded.tolerance))),
            ResultLine::new(
                "Range",
                format!(
                    "{} to {}",
                    format_resistance_compact(decoded.ohms - spread),
                    format_resistance_compact(decoded.ohms + spread)
                ),
            ),
        ];

        if !inputs.is_blank("value") {
            let ohms = parse_marking(inputs.text("value"))?;
            let names = encode_value(ohms, bands)?;
            lines.push(ResultLine::new(
                format!("Bands for {}", format_resistance_compact(ohms)),
                names.join(", "),
            ));
        }
        Ok(lines)
    }
}
