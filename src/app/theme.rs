//! Colours and styling for the bench UI.
//!
//! A dark bench-instrument look: charcoal panels, a phosphor-green scope
//! and amber highlights for warnings.

use eframe::egui::{self, Color32, Rounding, Stroke, Vec2};

/// Background colors
pub mod background {
    use super::Color32;

    /// Main window background.
    pub const MAIN: Color32 = Color32::from_rgb(22, 24, 28);

    /// Side and tool panels.
    pub const PANEL: Color32 = Color32::from_rgb(32, 35, 41);

    /// Buttons, text edits, combo boxes.
    pub const WIDGET: Color32 = Color32::from_rgb(44, 48, 56);

    pub const WIDGET_HOVERED: Color32 = Color32::from_rgb(56, 61, 71);

    pub const WIDGET_ACTIVE: Color32 = Color32::from_rgb(68, 74, 86);
}

/// Scope screen colours.
pub mod scope {
    use super::Color32;

    /// Screen fill.
    pub const SCREEN: Color32 = Color32::from_rgb(8, 14, 10);

    /// Bezel around the screen.
    pub const BEZEL: Color32 = Color32::from_rgb(60, 66, 62);

    /// Graticule division lines.
    pub const GRATICULE: Color32 = Color32::from_rgba_premultiplied(40, 56, 40, 60);

    /// Centre axes.
    pub const AXIS: Color32 = Color32::from_rgba_premultiplied(60, 90, 60, 90);

    /// Generator trace.
    pub const TRACE: Color32 = Color32::from_rgb(110, 240, 120);

    /// Dual-trace reference sine.
    pub const REFERENCE: Color32 = Color32::from_rgb(255, 196, 90);
}

/// Text colors
pub mod text {
    use super::Color32;

    pub const PRIMARY: Color32 = Color32::from_rgb(232, 234, 237);

    pub const SECONDARY: Color32 = Color32::from_rgb(150, 156, 165);

    pub const DISABLED: Color32 = Color32::from_rgb(95, 100, 108);

    /// Result values in calculator forms.
    pub const VALUE: Color32 = Color32::from_rgb(140, 220, 255);
}

/// UI accent colors
pub mod accent {
    use super::Color32;

    pub const PRIMARY: Color32 = Color32::from_rgb(110, 240, 120);

    /// Running output.
    pub const SUCCESS: Color32 = Color32::from_rgb(110, 240, 120);

    /// Calculator warnings and the stop button.
    pub const WARNING: Color32 = Color32::from_rgb(255, 176, 64);

    pub const ERROR: Color32 = Color32::from_rgb(240, 84, 80);
}

/// Standard rounding for UI elements
pub const ROUNDING: Rounding = Rounding {
    nw: 4.0,
    ne: 4.0,
    sw: 4.0,
    se: 4.0,
};

/// Smaller rounding for compact elements
pub const ROUNDING_SMALL: Rounding = Rounding {
    nw: 2.0,
    ne: 2.0,
    sw: 2.0,
    se: 2.0,
};

/// Width of the generator and calculator side panels.
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

/// Apply the bench theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let visuals = &mut style.visuals;
    visuals.dark_mode = true;

    visuals.window_fill = background::PANEL;
    visuals.window_stroke = Stroke::new(1.0, background::WIDGET_ACTIVE);
    visuals.window_rounding = ROUNDING;
    visuals.panel_fill = background::MAIN;

    let widgets = &mut visuals.widgets;
    for (state, fill, stroke) in [
        (&mut widgets.noninteractive, background::PANEL, text::SECONDARY),
        (&mut widgets.inactive, background::WIDGET, text::PRIMARY),
        (&mut widgets.hovered, background::WIDGET_HOVERED, text::PRIMARY),
        (&mut widgets.open, background::WIDGET_ACTIVE, text::PRIMARY),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.fg_stroke = Stroke::new(1.0, stroke);
        state.rounding = ROUNDING_SMALL;
    }
    widgets.active.bg_fill = background::WIDGET_ACTIVE;
    widgets.active.weak_bg_fill = background::WIDGET_ACTIVE;
    widgets.active.fg_stroke = Stroke::new(1.5, accent::PRIMARY);
    widgets.active.rounding = ROUNDING_SMALL;

    visuals.selection.bg_fill = accent::PRIMARY.gamma_multiply(0.25);
    visuals.selection.stroke = Stroke::new(1.0, accent::PRIMARY);
    visuals.extreme_bg_color = Color32::from_rgb(16, 18, 21);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(10.0, 4.0);
    style.spacing.slider_width = 160.0;

    ctx.set_style(style);
}
