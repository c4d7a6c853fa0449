pub mod constants;
pub mod permissions;
pub mod tracing;
