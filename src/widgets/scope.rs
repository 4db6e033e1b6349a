//! Scope screen for the generator preview.
//!
//! Paints a [`PreviewFrame`] over a graticule. The frame is already in
//! viewport pixels, so drawing only offsets it to the widget's rect.

use eframe::egui::{self, Color32, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2};

use crate::app::theme;
use crate::dsp::{PreviewFrame, SignalParams};

/// Configuration for the scope widget.
#[derive(Clone, Debug)]
pub struct ScopeConfig {
    /// Size of the screen.
    pub size: Vec2,
    pub trace_color: Color32,
    pub reference_color: Color32,
    pub line_thickness: f32,
    /// Draw a wide faint line under each trace.
    pub glow: bool,
    /// Horizontal graticule divisions.
    pub divisions_x: usize,
    /// Vertical graticule divisions.
    pub divisions_y: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(640.0, 400.0),
            trace_color: theme::scope::TRACE,
            reference_color: theme::scope::REFERENCE,
            line_thickness: 1.5,
            glow: true,
            divisions_x: 10,
            divisions_y: 8,
        }
    }
}

impl ScopeConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ..Default::default()
        }
    }

    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.line_thickness = thickness;
        self
    }
}

/// Corner label for the scope, e.g. `[RUNNING] Sine | 440 Hz`.
pub fn status_text(params: &SignalParams) -> String {
    let state = if params.frozen { "FROZEN" } else { "RUNNING" };
    format!("[{}] {} | {} Hz", state, params.shape.name(), params.frequency)
}

/// Draw the scope with `status` in the top-left corner and return its
/// response. The response rect is the size to render the next frame at.
pub fn scope_display(ui: &mut Ui, frame: &PreviewFrame, status: &str, config: &ScopeConfig) -> Response {
    let (rect, response) = ui.allocate_exact_size(config.size, Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter_at(rect);

        draw_screen(&painter, rect, config);

        if let Some(reference) = &frame.reference {
            draw_trace(&painter, &to_screen(reference, rect), config.reference_color, config);
        }
        draw_trace(&painter, &to_screen(&frame.primary, rect), config.trace_color, config);

        painter.text(
            rect.left_top() + Vec2::new(10.0, 8.0),
            egui::Align2::LEFT_TOP,
            status,
            egui::FontId::monospace(12.0),
            theme::text::VALUE,
        );

        painter.rect_stroke(rect, 4.0, Stroke::new(1.0, theme::scope::BEZEL));
    }

    response
}

fn draw_screen(painter: &egui::Painter, rect: Rect, config: &ScopeConfig) {
    painter.rect_filled(rect, 4.0, theme::scope::SCREEN);

    let grid = Stroke::new(0.5, theme::scope::GRATICULE);
    for x in graticule_lines(rect.left(), rect.width(), config.divisions_x) {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
    }
    for y in graticule_lines(rect.top(), rect.height(), config.divisions_y) {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
    }

    let axis = Stroke::new(1.0, theme::scope::AXIS);
    let center = rect.center();
    painter.line_segment([Pos2::new(center.x, rect.top()), Pos2::new(center.x, rect.bottom())], axis);
    painter.line_segment([Pos2::new(rect.left(), center.y), Pos2::new(rect.right(), center.y)], axis);

    // Minor ticks, five per division along the centre axes.
    let tick = 3.0;
    for x in graticule_lines(rect.left(), rect.width(), config.divisions_x * 5) {
        painter.line_segment([Pos2::new(x, center.y - tick), Pos2::new(x, center.y + tick)], axis);
    }
    for y in graticule_lines(rect.top(), rect.height(), config.divisions_y * 5) {
        painter.line_segment([Pos2::new(center.x - tick, y), Pos2::new(center.x + tick, y)], axis);
    }
}

fn draw_trace(painter: &egui::Painter, points: &[Pos2], color: Color32, config: &ScopeConfig) {
    if points.len() < 2 {
        return;
    }
    if config.glow {
        painter.add(Shape::line(
            points.to_vec(),
            Stroke::new(config.line_thickness * 3.0, color.gamma_multiply(0.15)),
        ));
    }
    painter.add(Shape::line(points.to_vec(), Stroke::new(config.line_thickness, color)));
}

/// Interior division line positions along one axis.
fn graticule_lines(start: f32, length: f32, divisions: usize) -> impl Iterator<Item = f32> {
    let step = length / divisions.max(1) as f32;
    (1..divisions).map(move |i| start + step * i as f32)
}

/// Offset viewport-pixel points into screen space.
fn to_screen(points: &[[f32; 2]], rect: Rect) -> Vec<Pos2> {
    points
        .iter()
        .map(|[x, y]| Pos2::new(rect.left() + x, rect.top() + y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_config_default() {
        let config = ScopeConfig::default();
        assert_eq!(config.divisions_x, 10);
        assert_eq!(config.divisions_y, 8);
        assert!(config.glow);
    }

    #[test]
    fn test_scope_config_builder() {
        let config = ScopeConfig::new(300.0, 200.0).with_glow(false).with_thickness(2.0);
        assert_eq!(config.size, Vec2::new(300.0, 200.0));
        assert!(!config.glow);
        assert_eq!(config.line_thickness, 2.0);
    }

    #[test]
    fn test_graticule_lines_are_interior() {
        let lines: Vec<f32> = graticule_lines(10.0, 100.0, 4).collect();
        assert_eq!(lines, vec![35.0, 60.0, 85.0]);
        assert_eq!(graticule_lines(0.0, 100.0, 0).count(), 0);
    }

    #[test]
    fn test_status_text() {
        let mut params = SignalParams::default();
        assert_eq!(status_text(&params), "[RUNNING] Sine | 440 Hz");

        params.frozen = true;
        params.shape = crate::dsp::WaveShape::Square;
        params.frequency = 1500.5;
        assert_eq!(status_text(&params), "[FROZEN] Square | 1500.5 Hz");
    }

    #[test]
    fn test_to_screen_offsets_points() {
        let rect = Rect::from_min_size(Pos2::new(20.0, 30.0), Vec2::new(100.0, 50.0));
        let points = to_screen(&[[0.0, 25.0], [99.0, 0.0]], rect);
        assert_eq!(points, vec![Pos2::new(20.0, 55.0), Pos2::new(119.0, 30.0)]);
    }
}
