//! Main application struct for the bench.
//!
//! `BenchApp` implements `eframe::App`: a toolbar with transport and audio
//! status, the generator controls on the left, the scope in the middle and
//! the calculators on the right.

use std::time::{Duration, Instant};

use eframe::egui::{self, Align, Layout, RichText, Vec2};

use crate::calculators::create_calculator_registry;
use crate::config::AppConfig;
use crate::dsp::params::{AMPLITUDE_PERCENT_RANGE, DUTY_PERCENT_RANGE, TIMEBASE_RANGE};
use crate::dsp::{
    FreezeController, ParameterStore, PreviewFrame, PreviewRenderer, Rectification, SignalParams,
    WaveShape,
};
use crate::engine::{AudioEngine, DeviceInfo, EngineEvent, PlaybackController, PlaybackState};
use crate::units::format_frequency;
use crate::widgets::{
    level_meter, scope_display, status_text, LevelMeterConfig, PeakHold, ScopeConfig,
};

use super::calculator_panel::CalculatorPanel;
use super::theme;

/// Main application state
pub struct BenchApp {
    params: ParameterStore,
    playback: PlaybackController<AudioEngine>,
    preview: PreviewRenderer,
    freeze: FreezeController,

    /// Last rendered preview, repainted until the next tick.
    frame: PreviewFrame,
    clock: RedrawClock,
    /// Scope size from the previous layout pass.
    scope_size: Vec2,

    /// Frequency field text; may hold an invalid entry.
    frequency_text: String,
    frequency_error: Option<String>,

    devices: Vec<DeviceInfo>,
    /// Sample rate reported by the running stream.
    sample_rate: Option<u32>,
    peak: PeakHold,

    calculators: CalculatorPanel,
    show_calculators: bool,

    /// Last audio error message to display
    status_error: Option<String>,
    theme_applied: bool,
}

impl BenchApp {
    pub fn new(config: &AppConfig) -> Self {
        let params = ParameterStore::new(SignalParams {
            playing: false,
            ..config.initial_params
        });
        let engine = AudioEngine::new(config.output_device.clone());
        let devices = engine.enumerate_devices();
        log::info!("Found {} output device(s)", devices.len());

        Self {
            playback: PlaybackController::new(engine, params.clone()),
            preview: PreviewRenderer::with_phase_step(params.clone(), config.phase_step),
            freeze: FreezeController::new(params.clone()),
            frame: PreviewFrame::default(),
            clock: RedrawClock::new(Duration::from_millis(config.redraw_interval_ms)),
            scope_size: ScopeConfig::default().size,
            frequency_text: config.initial_params.frequency.to_string(),
            frequency_error: None,
            devices,
            sample_rate: None,
            peak: PeakHold::default(),
            calculators: CalculatorPanel::new(&create_calculator_registry()),
            show_calculators: true,
            status_error: None,
            theme_applied: false,
            params,
        }
    }

    fn toggle_playback(&mut self) {
        match self.playback.toggle() {
            Ok(PlaybackState::Stopped) => {
                self.sample_rate = None;
                self.peak.reset();
                self.status_error = None;
            }
            Ok(PlaybackState::Playing) => self.status_error = None,
            Err(e) => {
                log::error!("Playback toggle failed: {}", e);
                self.status_error = Some(e.to_string());
            }
        }
    }

    fn select_device(&mut self, index: usize) {
        let result = self
            .playback
            .backend_mut()
            .select_device(index)
            .and_then(|()| self.playback.restart());
        if let Err(e) = result {
            log::error!("Device change failed: {}", e);
            self.status_error = Some(e.to_string());
        }
    }

    fn refresh_devices(&mut self) {
        self.devices = self.playback.backend().enumerate_devices();
    }

    /// Advance the preview once if a redraw interval has passed.
    fn tick(&mut self, now: Instant) {
        if !self.clock.tick(now) {
            return;
        }
        self.frame = self
            .preview
            .render_frame(self.scope_size.x.max(0.0) as usize, self.scope_size.y);
        self.peak.decay();
    }

    fn drain_engine_events(&mut self) {
        for event in self.playback.backend_mut().drain_events() {
            match event {
                EngineEvent::Started { sample_rate } => self.sample_rate = Some(sample_rate),
                EngineEvent::OutputLevel { peak } => self.peak.feed(peak),
            }
        }
    }

    /// Draw the top toolbar with transport controls and status
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) -> ToolbarActions {
        let mut actions = ToolbarActions::default();
        let params = self.params.snapshot();

        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("ELECTRO BENCH")
                .size(18.0)
                .color(theme::text::PRIMARY)
                .strong());

            ui.add_space(16.0);
            ui.separator();
            ui.add_space(16.0);

            let state = self.playback.state();
            let color = match state {
                PlaybackState::Playing => theme::accent::WARNING,
                PlaybackState::Stopped => theme::accent::SUCCESS,
            };
            if ui.button(RichText::new(state.action_label()).color(color)).clicked() {
                actions.toggle_playback = true;
            }

            let freeze_label = if params.frozen { "Unfreeze" } else { "Freeze" };
            if ui.button(freeze_label).clicked() {
                actions.toggle_freeze = true;
            }

            ui.add_space(16.0);
            ui.separator();
            ui.add_space(16.0);

            ui.toggle_value(&mut self.show_calculators, "Calculators");

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_space(8.0);
                let (status, status_color) = if self.playback.is_playing() {
                    ("● Output", theme::accent::SUCCESS)
                } else {
                    ("○ Stopped", theme::text::DISABLED)
                };
                ui.label(RichText::new(status).color(status_color).small());

                if let Some(info) = self.playback.backend().stream_info() {
                    let rate = self.sample_rate.unwrap_or(info.sample_rate);
                    ui.label(RichText::new(format!(
                        "{} • {} Hz • {}ch • {}",
                        info.device_name, rate, info.channels, info.sample_format
                    ))
                    .color(theme::text::SECONDARY)
                    .small());
                }
                level_meter(ui, self.peak.level(), &LevelMeterConfig::default());
            });
        });

        actions
    }

    fn draw_generator(&mut self, ui: &mut egui::Ui) -> GeneratorActions {
        let mut actions = GeneratorActions::default();
        let params = self.params.snapshot();

        ui.heading("Generator");
        ui.add_space(4.0);

        ui.label("Frequency");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.frequency_text)
                .desired_width(120.0)
                .hint_text("e.g. 440, 1,5k"),
        );
        if response.changed() {
            match self.params.set_frequency_text(&self.frequency_text) {
                Ok(_) => self.frequency_error = None,
                Err(e) => self.frequency_error = Some(e.to_string()),
            }
        }
        match &self.frequency_error {
            Some(error) => {
                ui.label(RichText::new(format!("⚠ {} (keeping {})", error, format_frequency(params.frequency)))
                    .color(theme::accent::ERROR)
                    .small());
            }
            None => {
                ui.label(RichText::new(format_frequency(params.frequency))
                    .color(theme::text::SECONDARY)
                    .small());
            }
        }
        ui.add_space(8.0);

        egui::Grid::new("generator_grid")
            .num_columns(2)
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                ui.label("Shape");
                let mut shape = params.shape;
                egui::ComboBox::from_id_salt("shape")
                    .selected_text(shape.name())
                    .show_ui(ui, |ui| {
                        for s in WaveShape::all() {
                            ui.selectable_value(&mut shape, *s, s.name());
                        }
                    });
                if shape != params.shape {
                    self.params.set_shape(shape);
                }
                ui.end_row();

                ui.label("Rectification");
                let mut rectification = params.rectification;
                egui::ComboBox::from_id_salt("rectification")
                    .selected_text(rectification.name())
                    .show_ui(ui, |ui| {
                        for r in Rectification::all() {
                            ui.selectable_value(&mut rectification, *r, r.name());
                        }
                    });
                if rectification != params.rectification {
                    self.params.set_rectification(rectification);
                }
                ui.end_row();

                ui.label("Duty");
                let mut duty = to_percent(params.duty_cycle);
                let duty_slider = ui.add_enabled(
                    params.shape == WaveShape::Square,
                    egui::Slider::new(&mut duty, DUTY_PERCENT_RANGE).suffix(" %"),
                );
                if duty_slider.changed() {
                    self.params.set_duty_percent(duty);
                }
                ui.end_row();

                let positive_label = if params.asymmetric { "Amplitude +" } else { "Amplitude" };
                ui.label(positive_label);
                let mut positive = to_percent(params.amplitude_positive);
                if ui
                    .add(egui::Slider::new(&mut positive, AMPLITUDE_PERCENT_RANGE).suffix(" %"))
                    .changed()
                {
                    self.params.set_amplitude_positive_percent(positive);
                }
                ui.end_row();

                ui.label("Amplitude −");
                let mut negative = to_percent(params.amplitude_negative);
                let negative_slider = ui.add_enabled(
                    params.asymmetric,
                    egui::Slider::new(&mut negative, AMPLITUDE_PERCENT_RANGE).suffix(" %"),
                );
                if negative_slider.changed() {
                    self.params.set_amplitude_negative_percent(negative);
                }
                ui.end_row();

                ui.label("Timebase");
                let mut timebase = params.timebase;
                if ui.add(egui::Slider::new(&mut timebase, TIMEBASE_RANGE)).changed() {
                    self.params.set_timebase(timebase);
                }
                ui.end_row();
            });

        ui.add_space(8.0);
        let mut asymmetric = params.asymmetric;
        if ui.checkbox(&mut asymmetric, "Asymmetric amplitude").changed() {
            self.params.set_asymmetric(asymmetric);
        }
        let mut dual_trace = params.dual_trace;
        if ui.checkbox(&mut dual_trace, "Dual trace").changed() {
            self.params.set_dual_trace(dual_trace);
        }
        let mut frozen = params.frozen;
        if ui.checkbox(&mut frozen, "Freeze preview").changed() {
            self.freeze.set_frozen(frozen);
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label(RichText::new("Output device").color(theme::text::SECONDARY));

        let preferred = self.playback.backend().preferred_device().map(str::to_lowercase);
        let current = self
            .devices
            .iter()
            .find(|d| match &preferred {
                Some(wanted) => d.name.to_lowercase().contains(wanted.as_str()),
                None => d.is_default,
            })
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "System default".to_string());

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("output_device")
                .selected_text(current.as_str())
                .width(200.0)
                .show_ui(ui, |ui| {
                    for device in &self.devices {
                        let label = if device.is_default {
                            format!("{} (default)", device.name)
                        } else {
                            device.name.clone()
                        };
                        if ui.selectable_label(device.name == current, label).clicked() {
                            actions.select_device = Some(device.index);
                        }
                    }
                });
            if ui.small_button("⟳").on_hover_text("Refresh devices").clicked() {
                actions.refresh_devices = true;
            }
        });

        actions
    }

    fn draw_scope(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size();
        let status = status_text(&self.params.snapshot());
        let response = scope_display(ui, &self.frame, &status, &ScopeConfig::new(size.x, size.y));
        self.scope_size = response.rect.size();
    }

    /// Draw the bottom status bar
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);

            if let Some(ref error) = self.status_error {
                ui.label(RichText::new(format!("⚠ {}", error))
                    .color(theme::accent::ERROR)
                    .small());
            } else {
                ui.label(RichText::new("Ready")
                    .color(theme::text::SECONDARY)
                    .small());
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(concat!("Electro Bench v", env!("CARGO_PKG_VERSION")))
                    .color(theme::text::DISABLED)
                    .small());
            });
        });
    }
}

/// Paces preview ticks independently of how often egui repaints.
struct RedrawClock {
    interval: Duration,
    last: Option<Instant>,
}

impl RedrawClock {
    fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Whether a tick is due at `now`. A due tick is recorded.
    fn tick(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time until the next tick is due.
    fn until_next(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

fn to_percent(fraction: f64) -> u32 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Actions collected from the toolbar for deferred execution
#[derive(Default)]
struct ToolbarActions {
    toggle_playback: bool,
    toggle_freeze: bool,
}

/// Actions collected from the generator panel for deferred execution
#[derive(Default)]
struct GeneratorActions {
    select_device: Option<usize>,
    refresh_devices: bool,
}

impl eframe::App for BenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.drain_engine_events();
        self.tick(Instant::now());

        let toolbar_actions = egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none()
                .fill(theme::background::PANEL)
                .inner_margin(egui::Margin::symmetric(0.0, 8.0)))
            .show(ctx, |ui| self.draw_toolbar(ui))
            .inner;

        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::none()
                .fill(theme::background::PANEL)
                .inner_margin(egui::Margin::symmetric(0.0, 4.0)))
            .show(ctx, |ui| self.draw_status_bar(ui));

        let generator_actions = egui::SidePanel::left("generator")
            .exact_width(theme::SIDE_PANEL_WIDTH)
            .frame(egui::Frame::none()
                .fill(theme::background::PANEL)
                .inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| self.draw_generator(ui))
            .inner;

        if self.show_calculators {
            egui::SidePanel::right("calculators")
                .default_width(theme::SIDE_PANEL_WIDTH)
                .frame(egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::same(12.0)))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.calculators.ui(ui));
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none()
                .fill(theme::background::MAIN)
                .inner_margin(egui::Margin::same(8.0)))
            .show(ctx, |ui| self.draw_scope(ui));

        // Handle deferred actions (to avoid borrow checker issues)
        if toolbar_actions.toggle_playback {
            self.toggle_playback();
        }
        if toolbar_actions.toggle_freeze {
            self.freeze.toggle();
        }
        if let Some(index) = generator_actions.select_device {
            self.select_device(index);
        }
        if generator_actions.refresh_devices {
            self.refresh_devices();
        }

        ctx.request_repaint_after(self.clock.until_next(Instant::now()));
    }
}
