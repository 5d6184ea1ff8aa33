//! Structured logging setup and the serializable log-event shape.

mod format;

pub use format::{LogEvent, StructuredLogger};
