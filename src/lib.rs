//! Electro Bench Library
//!
//! Audio signal generator with a live scope preview, plus a set of
//! electronics design calculators.

pub mod app;
pub mod calculators;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod units;
pub mod widgets;
