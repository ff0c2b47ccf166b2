//! Observability for hookrun: tracing subscriber setup and the rotating,
//! compressing file sink behind it.

pub mod log_rotation;
pub mod tracing_setup;
