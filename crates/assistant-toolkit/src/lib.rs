//! # assistant-toolkit
//!
//! Built-in tools for the terminal assistant. Each tool implements
//! `assistant_core::Tool` and nothing else; the core never sees their
//! internals.

mod calculator;
mod weather;
mod web_search;

pub use calculator::CalculatorTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;
