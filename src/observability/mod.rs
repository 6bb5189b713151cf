//! Observability subsystem for crossquery
//!
//! Structured JSON logging of the events the compiler, executor, codec and
//! pager emit. Observability is read-only: logging never changes a result
//! and never fails an operation.
//!
//! # Usage
//!
//! ```ignore
//! use crossquery::observability::{log_event, Event};
//!
//! log_event(Event::FilterEmpty, &[("type", "Customer")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
