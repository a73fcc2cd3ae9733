//! Concrete adapter implementations for ports.

pub mod composite_reporter;
pub mod console_report_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod svg_report_adapter;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
