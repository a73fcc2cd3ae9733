//! Port traits for the collaborators the pipelines depend on.

pub mod config_port;
pub mod data_port;
pub mod report_port;
