pub mod audit;
pub mod config;
pub mod error;
pub mod format;
pub mod import;
pub mod telemetry;
