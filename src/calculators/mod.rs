//! Calculators module
//!
//! Bench calculators for common electronics design sums, each a form of
//! text fields producing labelled results.

pub mod battery;
pub mod calculator;
pub mod capacitor;
pub mod divider;
pub mod filter;
pub mod led;
pub mod lm317;
pub mod registry;
pub mod resistor;
pub mod standard_values;
pub mod timer555;
pub mod trace_width;
pub mod zener;

pub use battery::{BatteryChargeCalculator, ChargeTimeCalculator};
pub use calculator::{
    CalcError, Calculator, CalculatorCategory, CalculatorInfo, FieldDefinition, FieldKind, Inputs,
    ResultLine,
};
pub use capacitor::CapacitorCalculator;
pub use divider::DividerCalculator;
pub use filter::FilterCalculator;
pub use led::LedCalculator;
pub use lm317::Lm317Calculator;
pub use registry::CalculatorRegistry;
pub use resistor::ResistorColorCalculator;
pub use timer555::Timer555Calculator;
pub use trace_width::TraceWidthCalculator;
pub use zener::ZenerCalculator;

/// Creates a calculator registry with all built-in calculators.
pub fn create_calculator_registry() -> CalculatorRegistry {
    let mut registry = CalculatorRegistry::new();
    registry.register::<Lm317Calculator>();
    registry.register::<ZenerCalculator>();
    registry.register::<DividerCalculator>();
    registry.register::<BatteryChargeCalculator>();
    registry.register::<ChargeTimeCalculator>();
    registry.register::<Timer555Calculator>();
    registry.register::<ResistorColorCalculator>();
    registry.register::<CapacitorCalculator>();
    registry.register::<FilterCalculator>();
    registry.register::<LedCalculator>();
    registry.register::<TraceWidthCalculator>();
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_calculators_registered() {
        let registry = create_calculator_registry();
        assert_eq!(registry.len(), 11);
        for category in CalculatorCategory::all() {
            assert!(registry.in_category(*category).count() > 0, "{:?}", category);
        }
    }

    #[test]
    fn test_field_ids_unique() {
        let registry = create_calculator_registry();
        for calc in registry.create_all() {
            let fields = calc.fields();
            for (i, a) in fields.iter().enumerate() {
                for b in &fields[i + 1..] {
                    assert_ne!(a.id, b.id, "{}", calc.info().id);
                }
            }
        }
    }

    #[test]
    fn test_defaults_compute_or_ask_for_input() {
        let registry = create_calculator_registry();
        for calc in registry.create_all() {
            match calc.evaluate(&calc.default_values()) {
                Ok(lines) => assert!(!lines.is_empty(), "{}", calc.info().id),
                Err(e) => assert!(!e.to_string().is_empty()),
            }
        }
    }
}
