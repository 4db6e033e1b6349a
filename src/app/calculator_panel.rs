//! Calculator side panel.
//!
//! Holds one instance of every registered calculator together with the text
//! the user typed into each, so switching between forms keeps their inputs.

use eframe::egui::{self, RichText};

use crate::calculators::{CalcError, Calculator, CalculatorCategory, CalculatorRegistry, FieldKind, ResultLine};

use super::theme;

pub struct CalculatorPanel {
    calculators: Vec<Box<dyn Calculator>>,
    /// Field texts, parallel to `calculators`.
    values: Vec<Vec<String>>,
    selected: usize,
}

impl CalculatorPanel {
    pub fn new(registry: &CalculatorRegistry) -> Self {
        let calculators = registry.create_all();
        let values = calculators.iter().map(|c| c.default_values()).collect();
        Self {
            calculators,
            values,
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    pub fn selected(&self) -> Option<&dyn Calculator> {
        self.calculators.get(self.selected).map(|c| c.as_ref())
    }

    /// Switch to the calculator with `id`. Returns false if none matches.
    pub fn select(&mut self, id: &str) -> bool {
        match self.calculators.iter().position(|c| c.info().id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Field texts of the selected form.
    pub fn values(&self) -> &[String] {
        self.values.get(self.selected).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace one field's text in the selected form.
    pub fn set_value(&mut self, field: usize, text: impl Into<String>) {
        if let Some(slot) = self
            .values
            .get_mut(self.selected)
            .and_then(|values| values.get_mut(field))
        {
            *slot = text.into();
        }
    }

    /// Restore the selected form's defaults.
    pub fn reset(&mut self) {
        if let Some(calc) = self.calculators.get(self.selected) {
            self.values[self.selected] = calc.default_values();
        }
    }

    /// Evaluate the selected form as it stands.
    pub fn results(&self) -> Option<Result<Vec<ResultLine>, CalcError>> {
        let calc = self.calculators.get(self.selected)?;
        Some(calc.evaluate(&self.values[self.selected]))
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.selector_ui(ui);
        ui.separator();

        let Some(calc) = self.calculators.get(self.selected) else {
            ui.label(RichText::new("No calculators").color(theme::text::DISABLED));
            return;
        };
        let id = calc.info().id;
        ui.label(RichText::new(calc.info().description).color(theme::text::SECONDARY).small());
        ui.add_space(6.0);

        let fields = calc.fields();
        let values = &mut self.values[self.selected];
        egui::Grid::new(("calc_fields", id))
            .num_columns(3)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                for (field, value) in fields.iter().zip(values.iter_mut()) {
                    ui.label(field.label);
                    match field.kind {
                        FieldKind::Choice(options) => {
                            egui::ComboBox::from_id_salt((id, field.id))
                                .selected_text(value.as_str())
                                .show_ui(ui, |ui| {
                                    for option in options {
                                        ui.selectable_value(value, option.to_string(), *option);
                                    }
                                });
                        }
                        _ => {
                            let hint = if field.optional { "optional" } else { "" };
                            ui.add(
                                egui::TextEdit::singleline(value)
                                    .desired_width(110.0)
                                    .hint_text(hint),
                            );
                        }
                    }
                    ui.label(RichText::new(field.unit).color(theme::text::SECONDARY));
                    ui.end_row();
                }
            });

        ui.add_space(4.0);
        if ui.small_button("Reset").clicked() {
            self.reset();
        }
        ui.separator();

        match self.results() {
            Some(Ok(lines)) => results_ui(ui, id, &lines),
            Some(Err(e)) => {
                ui.label(RichText::new(e.to_string()).color(theme::accent::ERROR));
            }
            None => {}
        }
    }

    fn selector_ui(&mut self, ui: &mut egui::Ui) {
        let current = self
            .selected()
            .map(|c| c.info().name)
            .unwrap_or("Select calculator");

        let mut chosen = self.selected;
        egui::ComboBox::from_id_salt("calculator_select")
            .selected_text(current)
            .width(ui.available_width() - 8.0)
            .show_ui(ui, |ui| {
                for category in CalculatorCategory::all() {
                    ui.label(RichText::new(category.name()).color(category.color()).small());
                    for (index, calc) in self.calculators.iter().enumerate() {
                        if calc.info().category == *category {
                            ui.selectable_value(&mut chosen, index, calc.info().name);
                        }
                    }
                }
            });

        if chosen != self.selected {
            log::debug!("Calculator selected: {}", self.calculators[chosen].info().id);
            self.selected = chosen;
        }
    }
}

fn results_ui(ui: &mut egui::Ui, id: &str, lines: &[ResultLine]) {
    egui::Grid::new(("calc_results", id))
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for line in lines {
                ui.label(RichText::new(&line.label).color(theme::text::SECONDARY));
                let color = if line.warning {
                    theme::accent::WARNING
                } else {
                    theme::text::VALUE
                };
                ui.label(RichText::new(&line.value).color(color).strong());
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::create_calculator_registry;

    fn panel() -> CalculatorPanel {
        CalculatorPanel::new(&create_calculator_registry())
    }

    #[test]
    fn test_panel_holds_every_calculator() {
        let panel = panel();
        assert_eq!(panel.len(), create_calculator_registry().len());
        assert!(!panel.is_empty());
        assert!(panel.selected().is_some());
    }

    #[test]
    fn test_select_by_id() {
        let mut panel = panel();
        assert!(panel.select("passive.led"));
        assert_eq!(panel.selected().map(|c| c.info().id), Some("passive.led"));
        assert!(!panel.select("missing"));
        assert_eq!(panel.selected().map(|c| c.info().id), Some("passive.led"));
    }

    #[test]
    fn test_inputs_survive_switching() {
        let mut panel = panel();
        panel.select("passive.rc_filter");
        panel.set_value(2, "1k");
        panel.select("passive.led");
        panel.select("passive.rc_filter");
        assert_eq!(panel.values()[2], "1k");
    }

    #[test]
    fn test_results_follow_edits() {
        let mut panel = panel();
        panel.select("passive.led");
        let before = panel.results().unwrap().unwrap();
        panel.set_value(1, "5");
        let after = panel.results().unwrap().unwrap();
        assert_ne!(before[0].value, after[0].value);

        panel.set_value(1, "abc");
        assert!(panel.results().unwrap().is_err());

        panel.reset();
        assert_eq!(panel.results().unwrap().unwrap(), before);
    }

    #[test]
    fn test_set_value_out_of_range_is_ignored() {
        let mut panel = panel();
        let before = panel.values().to_vec();
        panel.set_value(99, "1");
        assert_eq!(panel.values(), before.as_slice());
    }
}
