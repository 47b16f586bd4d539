pub mod constants;
pub mod settings;
pub mod tracing;
