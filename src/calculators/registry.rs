//! Calculator registry.
//!
//! The registry provides a central catalog of available calculators,
//! letting the UI list them and instantiate one by its ID.

use std::collections::HashMap;

use super::calculator::{Calculator, CalculatorCategory, CalculatorInfo};

/// Factory function type for creating calculator instances.
pub type CalculatorFactory = fn() -> Box<dyn Calculator>;

/// Central registry of available calculators.
///
/// # Example
///
/// ```ignore
/// let mut registry = CalculatorRegistry::new();
/// registry.register::<Lm317Calculator>();
///
/// if let Some(calc) = registry.create("power.lm317") {
///     let lines = calc.evaluate(&calc.default_values());
/// }
/// ```
pub struct CalculatorRegistry {
    /// Map of calculator ID to factory function.
    factories: HashMap<&'static str, CalculatorFactory>,
    /// Calculator information in registration order.
    infos: Vec<CalculatorInfo>,
}

impl CalculatorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            infos: Vec::new(),
        }
    }

    /// Registers a calculator type.
    ///
    /// A temporary instance is created to extract its info. Registering the
    /// same ID twice keeps the first registration.
    pub fn register<C: Calculator + Default>(&mut self) {
        let temp = C::default();
        let info = temp.info().clone();
        let id = info.id;

        if self.factories.contains_key(id) {
            log::warn!("Calculator '{}' is already registered", id);
            return;
        }

        self.factories.insert(id, create_calculator::<C>);
        self.infos.push(info);
    }

    /// Creates a new instance of a calculator by its ID.
    pub fn create(&self, id: &str) -> Option<Box<dyn Calculator>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Creates one instance of every registered calculator, in registration order.
    pub fn create_all(&self) -> Vec<Box<dyn Calculator>> {
        self.infos
            .iter()
            .filter_map(|info| self.create(info.id))
            .collect()
    }

    /// Returns all registered calculators.
    pub fn list_calculators(&self) -> &[CalculatorInfo] {
        &self.infos
    }

    /// Returns the calculators in one category.
    pub fn in_category(&self, category: CalculatorCategory) -> impl Iterator<Item = &CalculatorInfo> {
        self.infos.iter().filter(move |info| info.category == category)
    }

    /// Returns the number of registered calculators.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no calculators are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Checks if a calculator with the given ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn create_calculator<C: Calculator + Default>() -> Box<dyn Calculator> {
    Box::new(C::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::calculator::{CalcError, FieldDefinition, Inputs, ResultLine};

    #[derive(Default)]
    struct Doubler;

    impl Calculator for Doubler {
        fn info(&self) -> &CalculatorInfo {
            static INFO: CalculatorInfo = CalculatorInfo {
                id: "test.doubler",
                name: "Doubler",
                category: CalculatorCategory::Passive,
                description: "Doubles a value",
            };
            &INFO
        }

        fn fields(&self) -> &[FieldDefinition] {
            const FIELDS: &[FieldDefinition] = &[FieldDefinition::number("x", "X", "", "2")];
            FIELDS
        }

        fn compute(&self, inputs: &Inputs<'_>) -> Result<Vec<ResultLine>, CalcError> {
            let x = inputs.number("x")?;
            Ok(vec![ResultLine::new("2X", format!("{}", 2.0 * x))])
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = CalculatorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = CalculatorRegistry::new();
        registry.register::<Doubler>();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("test.doubler"));
        assert!(!registry.contains("nonexistent"));

        let calc = registry.create("test.doubler").unwrap();
        assert_eq!(calc.info().name, "Doubler");
        let lines = calc.evaluate(&calc.default_values()).unwrap();
        assert_eq!(lines, vec![ResultLine::new("2X", "4")]);
    }

    #[test]
    fn test_create_nonexistent() {
        let registry = CalculatorRegistry::new();
        assert!(registry.create("nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut registry = CalculatorRegistry::new();
        registry.register::<Doubler>();
        registry.register::<Doubler>();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list_calculators().len(), 1);
    }

    #[test]
    fn test_in_category() {
        let mut registry = CalculatorRegistry::new();
        registry.register::<Doubler>();
        assert_eq!(registry.in_category(CalculatorCategory::Passive).count(), 1);
        assert_eq!(registry.in_category(CalculatorCategory::Power).count(), 0);
        assert_eq!(registry.create_all().len(), 1);
    }
}
