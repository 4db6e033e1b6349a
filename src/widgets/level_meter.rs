//! Output level meter.
//!
//! A horizontal bar showing the output peak in dBFS, fed from the audio
//! callback's level events. The bar falls back slowly so short blocks
//! remain visible between repaints.

use eframe::egui::{self, Color32, Rect, Response, Sense, Ui, Vec2};

use crate::app::theme;

/// Lowest level shown; anything quieter reads as an empty bar.
pub const FLOOR_DB: f32 = -60.0;

/// Configuration for the level meter.
#[derive(Clone, Debug)]
pub struct LevelMeterConfig {
    pub width: f32,
    pub height: f32,
    /// Level in dBFS above which the bar turns amber.
    pub warn_db: f32,
    /// Level in dBFS above which the bar turns red.
    pub clip_db: f32,
}

impl Default for LevelMeterConfig {
    fn default() -> Self {
        Self {
            width: 90.0,
            height: 10.0,
            warn_db: -6.0,
            clip_db: -0.5,
        }
    }
}

/// Peak hold with linear fall-off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeakHold {
    level: f32,
}

impl PeakHold {
    /// Fall-off per UI tick as a fraction of full scale.
    const DECAY: f32 = 0.05;

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Record a peak from the engine.
    pub fn feed(&mut self, peak: f32) {
        self.level = self.level.max(peak.clamp(0.0, 1.0));
    }

    /// Let the held level fall by one tick.
    pub fn decay(&mut self) {
        self.level = (self.level - Self::DECAY).max(0.0);
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Convert a linear peak to dBFS, floored at [`FLOOR_DB`].
pub fn to_dbfs(peak: f32) -> f32 {
    if peak <= 0.0 {
        FLOOR_DB
    } else {
        (20.0 * peak.log10()).max(FLOOR_DB)
    }
}

/// Bar fill fraction for a level in dBFS.
fn fill_fraction(db: f32) -> f32 {
    ((db - FLOOR_DB) / -FLOOR_DB).clamp(0.0, 1.0)
}

fn level_color(db: f32, config: &LevelMeterConfig) -> Color32 {
    if db >= config.clip_db {
        theme::accent::ERROR
    } else if db >= config.warn_db {
        theme::accent::WARNING
    } else {
        theme::accent::SUCCESS
    }
}

/// Draw the meter for a linear `peak` in 0..=1.
pub fn level_meter(ui: &mut Ui, peak: f32, config: &LevelMeterConfig) -> Response {
    let db = to_dbfs(peak);
    let text_width = 56.0;
    let (rect, response) = ui.allocate_exact_size(
        Vec2::new(config.width + text_width, config.height),
        Sense::hover(),
    );

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let bar_rect = Rect::from_min_size(rect.min, Vec2::new(config.width, config.height));
        painter.rect_filled(bar_rect, 2.0, theme::background::WIDGET);

        let fill = fill_fraction(db) * bar_rect.width();
        if fill > 0.0 {
            let fill_rect = Rect::from_min_size(bar_rect.min, Vec2::new(fill, bar_rect.height()));
            painter.rect_filled(fill_rect, 2.0, level_color(db, config));
        }
        painter.rect_stroke(
            bar_rect,
            2.0,
            egui::Stroke::new(1.0, theme::background::WIDGET_HOVERED),
        );

        let label = if db <= FLOOR_DB {
            "-inf dB".to_string()
        } else {
            format!("{:.1} dB", db)
        };
        painter.text(
            egui::pos2(bar_rect.right() + 6.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(config.height),
            theme::text::SECONDARY,
        );
    }

    response.on_hover_text("Output peak level")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dbfs() {
        assert_eq!(to_dbfs(1.0), 0.0);
        assert!((to_dbfs(0.5) + 6.0206).abs() < 1e-3);
        assert_eq!(to_dbfs(0.0), FLOOR_DB);
        assert_eq!(to_dbfs(1e-9), FLOOR_DB);
    }

    #[test]
    fn test_fill_fraction() {
        assert_eq!(fill_fraction(0.0), 1.0);
        assert_eq!(fill_fraction(FLOOR_DB), 0.0);
        assert!((fill_fraction(-30.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_level_colors() {
        let config = LevelMeterConfig::default();
        assert_eq!(level_color(-20.0, &config), theme::accent::SUCCESS);
        assert_eq!(level_color(-3.0, &config), theme::accent::WARNING);
        assert_eq!(level_color(0.0, &config), theme::accent::ERROR);
    }

    #[test]
    fn test_peak_hold_rises_and_decays() {
        let mut hold = PeakHold::default();
        hold.feed(0.5);
        hold.feed(0.2);
        assert_eq!(hold.level(), 0.5);
        hold.decay();
        assert!((hold.level() - 0.45).abs() < 1e-6);
        hold.feed(2.0);
        assert_eq!(hold.level(), 1.0);
        for _ in 0..40 {
            hold.decay();
        }
        assert_eq!(hold.level(), 0.0);
        hold.feed(0.3);
        hold.reset();
        assert_eq!(hold.level(), 0.0);
    }
}
