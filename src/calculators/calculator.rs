//! The core Calculator trait and supporting types.
//!
//! A calculator is a stateless form: it declares its input fields, and turns
//! the text the user typed into a list of labelled results.

use egui::Color32;
use thiserror::Error;

use crate::units::{parse_number, parse_value, ParseError};

/// Category of a calculator, used for grouping and UI coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalculatorCategory {
    /// Regulators, dividers, battery chargers.
    Power,
    /// Timers and oscillators.
    Timing,
    /// Resistors, capacitors, filters, LEDs.
    Passive,
    /// Board layout.
    Pcb,
}

impl CalculatorCategory {
    /// Returns the color associated with this category.
    pub fn color(&self) -> Color32 {
        match self {
            CalculatorCategory::Power => Color32::from_rgb(255, 183, 77), // Orange #FFB74D
            CalculatorCategory::Timing => Color32::from_rgb(66, 165, 245), // Blue #42A5F5
            CalculatorCategory::Passive => Color32::from_rgb(38, 166, 154), // Teal #26A69A
            CalculatorCategory::Pcb => Color32::from_rgb(126, 87, 194),   // Purple #7E57C2
        }
    }

    /// Returns a human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorCategory::Power => "Power",
            CalculatorCategory::Timing => "Timing",
            CalculatorCategory::Passive => "Passive",
            CalculatorCategory::Pcb => "PCB",
        }
    }

    pub fn all() -> &'static [CalculatorCategory] {
        &[
            CalculatorCategory::Power,
            CalculatorCategory::Timing,
            CalculatorCategory::Passive,
            CalculatorCategory::Pcb,
        ]
    }
}

/// Static information about a calculator.
#[derive(Clone, Debug)]
pub struct CalculatorInfo {
    /// Unique identifier (e.g., "power.lm317").
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// The category this calculator belongs to.
    pub category: CalculatorCategory,
    /// A brief description of what it computes.
    pub description: &'static str,
}

/// How a field's text is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain decimal number, `,` accepted as separator.
    Number,
    /// Number with an optional engineering suffix (`4.7k`, `100n`).
    Scaled,
    /// Whole number of at least one.
    Count,
    /// One of a fixed list of options.
    Choice(&'static [&'static str]),
    /// Free text such as a component marking.
    Text,
}

/// Definition of one input field.
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    /// Identifier used by `compute` to look the value up.
    pub id: &'static str,
    /// Label displayed in the UI.
    pub label: &'static str,
    /// Unit shown after the field, may be empty.
    pub unit: &'static str,
    pub kind: FieldKind,
    /// Initial text.
    pub default: &'static str,
    /// Whether the field may be left blank.
    pub optional: bool,
}

impl FieldDefinition {
    pub const fn number(id: &'static str, label: &'static str, unit: &'static str, default: &'static str) -> Self {
        Self {
            id,
            label,
            unit,
            kind: FieldKind::Number,
            default,
            optional: false,
        }
    }

    pub const fn scaled(id: &'static str, label: &'static str, unit: &'static str, default: &'static str) -> Self {
        Self {
            id,
            label,
            unit,
            kind: FieldKind::Scaled,
            default,
            optional: false,
        }
    }

    pub const fn count(id: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            id,
            label,
            unit: "",
            kind: FieldKind::Count,
            default,
            optional: false,
        }
    }

    pub const fn choice(id: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            id,
            label,
            unit: "",
            kind: FieldKind::Choice(options),
            default: match options {
                [first, ..] => *first,
                [] => "",
            },
            optional: false,
        }
    }

    pub const fn text(id: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            id,
            label,
            unit: "",
            kind: FieldKind::Text,
            default,
            optional: true,
        }
    }

    /// Replaces the initial text.
    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    /// Marks the field as allowed to be blank.
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// One labelled line of output.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultLine {
    pub label: String,
    pub value: String,
    /// Cautionary line, drawn in the warning color.
    pub warning: bool,
}

impl ResultLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            warning: false,
        }
    }

    pub fn warning(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            warning: true,
        }
    }
}

/// Errors reported to the user instead of a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A field could not be parsed.
    #[error("{field}: {source}")]
    InvalidInput {
        field: &'static str,
        #[source]
        source: ParseError,
    },
    /// A required field is blank.
    #[error("{0} is required")]
    Missing(&'static str),
    /// A field must be strictly positive.
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    /// The inputs describe an impossible circuit.
    #[error("{0}")]
    OutOfRange(String),
    /// Wrong number of blank fields for a solve-for-the-missing form.
    #[error("Leave exactly one of {0} empty")]
    Underdetermined(&'static str),
    /// A component code or marking was not recognised.
    #[error("Unrecognised code: {0}")]
    InvalidCode(String),
}

/// Field values paired with their definitions.
pub struct Inputs<'a> {
    fields: &'a [FieldDefinition],
    values: &'a [String],
}

impl<'a> Inputs<'a> {
    pub fn new(fields: &'a [FieldDefinition], values: &'a [String]) -> Self {
        Self { fields, values }
    }

    fn field(&self, id: &str) -> Option<(usize, &'a FieldDefinition)> {
        self.fields.iter().enumerate().find(|(_, f)| f.id == id)
    }

    fn label(&self, id: &'static str) -> &'static str {
        self.field(id).map(|(_, f)| f.label).unwrap_or(id)
    }

    /// Trimmed text of a field, empty if absent.
    pub fn text(&self, id: &str) -> &'a str {
        self.field(id)
            .and_then(|(i, _)| self.values.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    pub fn is_blank(&self, id: &str) -> bool {
        self.text(id).is_empty()
    }

    /// Parse a field as a number, or `None` if it is blank.
    pub fn optional(&self, id: &'static str) -> Result<Option<f64>, CalcError> {
        let text = self.text(id);
        if text.is_empty() {
            return Ok(None);
        }
        let kind = self.field(id).map(|(_, f)| f.kind).unwrap_or(FieldKind::Number);
        let parsed = match kind {
            FieldKind::Scaled => parse_value(text),
            _ => parse_number(text),
        };
        parsed.map(Some).map_err(|source| CalcError::InvalidInput {
            field: self.label(id),
            source,
        })
    }

    /// Parse a required numeric field.
    pub fn number(&self, id: &'static str) -> Result<f64, CalcError> {
        self.optional(id)?
            .ok_or_else(|| CalcError::Missing(self.label(id)))
    }

    /// Parse a required field that must be strictly positive.
    pub fn positive(&self, id: &'static str) -> Result<f64, CalcError> {
        let value = self.number(id)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(CalcError::NotPositive(self.label(id)))
        }
    }

    /// Parse a whole-number field of at least one.
    pub fn count(&self, id: &'static str) -> Result<u32, CalcError> {
        let value = self.number(id)?;
        if value < 1.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(CalcError::InvalidInput {
                field: self.label(id),
                source: ParseError::InvalidNumber(self.text(id).to_string()),
            });
        }
        Ok(value as u32)
    }

    /// Selected option of a choice field, or its first option.
    pub fn choice(&self, id: &str) -> &'a str {
        let text = self.text(id);
        if !text.is_empty() {
            return text;
        }
        match self.field(id).map(|(_, f)| f.kind) {
            Some(FieldKind::Choice(options)) => options.first().copied().unwrap_or(""),
            _ => "",
        }
    }
}

/// The trait all calculators implement.
///
/// `Send + 'static` so instances can be held by the app across frames.
pub trait Calculator: Send + 'static {
    /// Returns static information about this calculator.
    fn info(&self) -> &CalculatorInfo;

    /// Returns the input fields, in display order.
    fn fields(&self) -> &[FieldDefinition];

    /// Compute results from the current field values.
    fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError>;

    /// Field texts to show before the user types anything.
    fn default_values(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.default.to_string()).collect()
    }

    /// Convenience wrapper pairing `values` with `fields()`.
    fn evaluate(&self, values: &[String]) -> Result<Vec<ResultLine>, CalcError> {
        self.compute(&Inputs::new(self.fields(), values))
    }
}
