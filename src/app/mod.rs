//! Application module
//!
//! The egui application: theme, bench window and calculator panel.

pub mod bench_app;
pub mod calculator_panel;
pub mod theme;

pub use bench_app::BenchApp;
pub use calculator_panel::CalculatorPanel;
