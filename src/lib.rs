//! Library root for the `logspool` crate
//!
//! Bridges a generic structured-logging contract to an error-tracking
//! backend's capture capability, persisting every outbound event as a
//! uniquely named JSON file on local disk instead of sending it anywhere.

// Core error handling
pub mod errors;

// Event classification & context
pub mod context;
pub mod normalize;
pub mod severity;

// Backend capture capability
pub mod client;
pub mod dsn;

// File-based event transport
pub mod transport;

// Logging adapter & `log` facade bridge
pub mod facade;
pub mod logger;

// Configuration
pub mod config;

#[cfg(test)]
mod tests {
    pub mod client_envelope_test;
    pub mod logger_flow_test;
}

pub use client::{EventCapture, EventData, EventId, FileCaptureClient, NoopCapture};
pub use config::SpoolConfig;
pub use context::{CapturedError, ContextValue, LogContext};
pub use dsn::Dsn;
pub use errors::{SpoolError, SpoolResult};
pub use facade::SpoolLog;
pub use logger::SpoolLogger;
pub use severity::Severity;
pub use transport::{FileTransport, PayloadSink};
