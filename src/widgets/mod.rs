//! Widgets module
//!
//! Custom painted controls: the scope screen and the output level meter.

pub mod level_meter;
pub mod scope;

pub use level_meter::{level_meter, LevelMeterConfig, PeakHold};
pub use scope::{scope_display, status_text, ScopeConfig};
