//! Bridge from the `log` facade to the spooling adapter
//!
//! Lets `log::error!` and friends feed the event spool. The `log::Log`
//! signature cannot surface errors, so capture failures in this path are
//! reported through `tracing` instead of propagating.

use crate::context::LogContext;
use crate::logger::SpoolLogger;
use crate::severity::Severity;
use log::{Metadata, Record};
use tracing::warn;

/// `log::Log` implementation forwarding records to a [`SpoolLogger`].
pub struct SpoolLog {
    inner: SpoolLogger,
}

impl SpoolLog {
    pub fn new(inner: SpoolLogger) -> Self {
        SpoolLog { inner }
    }

    /// Register this bridge as the global `log` logger.
    pub fn install(self, max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for SpoolLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let severity = Severity::from_log_level(record.level());
        let message = record.args().to_string();

        if let Err(error) =
            self.inner
                .log(severity.as_str(), Some(&message), LogContext::new())
        {
            warn!("failed to spool log record: {error}");
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoopCapture;
    use std::sync::Arc;

    #[test]
    fn bridge_forwards_records_without_panicking() {
        let bridge = SpoolLog::new(SpoolLogger::with_capture(Arc::new(NoopCapture)));

        // Built and consumed in one statement: the record borrows the
        // format_args temporary.
        log::Log::log(
            &bridge,
            &Record::builder()
                .args(format_args!("bridged message"))
                .level(log::Level::Warn)
                .target("bridge_test")
                .build(),
        );
    }
}
