//! The logging adapter
//!
//! [`SpoolLogger`] implements the generic logging contract on top of an
//! injected capture capability: map the level, pull out the reserved `user`
//! entry, interpolate `{key}` placeholders, split off a captured exception,
//! and hand the normalized event data to the backend.

use crate::client::{EventCapture, EventData, FileCaptureClient};
use crate::config::SpoolConfig;
use crate::context::{CapturedError, ContextValue, LogContext};
use crate::dsn::Dsn;
use crate::errors::SpoolResult;
use crate::severity::Severity;
use crate::transport::FileTransport;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Reserved context key holding user identity for the outgoing event.
pub const USER_KEY: &str = "user";

/// Reserved context key holding a captured error value.
pub const EXCEPTION_KEY: &str = "exception";

/// Logging adapter bridging `log(level, message, context)` calls to the
/// backend's capture capability.
pub struct SpoolLogger {
    client: Arc<dyn EventCapture>,
}

impl SpoolLogger {
    /// Build a logger spooling to `directory`, authenticated by the DSN's
    /// credential pair.
    pub fn new(directory: impl AsRef<Path>, dsn: &str) -> SpoolResult<Self> {
        let dsn = Dsn::parse(dsn)?;
        let transport = FileTransport::new(directory.as_ref());
        Ok(Self::with_capture(Arc::new(FileCaptureClient::new(
            dsn,
            Box::new(transport),
        ))))
    }

    /// Build a logger from loaded configuration.
    pub fn from_config(config: &SpoolConfig) -> SpoolResult<Self> {
        Self::new(&config.directory, &config.dsn)
    }

    /// Build a logger over an arbitrary capture capability.
    pub fn with_capture(client: Arc<dyn EventCapture>) -> Self {
        SpoolLogger { client }
    }

    /// Log with an arbitrary level.
    ///
    /// Fire-and-forget on success; capture and transport failures propagate
    /// unchanged. A missing message is valid when the context carries an
    /// exception — the event headline then falls back to the error's own
    /// message.
    pub fn log(
        &self,
        level: &str,
        message: Option<&str>,
        mut context: LogContext,
    ) -> SpoolResult<()> {
        let severity = Severity::from_report_level(level);

        // The user entry is reserved: never interpolated, never extra data.
        let user = context.remove(USER_KEY).map(|value| value.to_value());

        let message = interpolate(message.unwrap_or(""), &mut context);

        let exception = take_exception(&mut context);

        let mut data = EventData::new(severity);
        if let Some(user) = user {
            data = data.with_user(user);
        }
        if !context.is_empty() {
            let extra: Map<String, Value> = context
                .iter()
                .map(|(key, value)| (key.clone(), value.to_value()))
                .collect();
            data = data.with_extra(extra);
        }

        if let Some(error) = exception {
            let hint = (!message.is_empty()).then_some(message.as_str());
            self.client.capture_exception(&error, data, None, None, hint)?;
            return Ok(());
        }

        self.client.capture_message(&message, &Map::new(), data)?;
        Ok(())
    }
}

/// Remove the `exception` entry if it actually holds a captured error.
/// Anything else under that key is ordinary context data.
fn take_exception(context: &mut LogContext) -> Option<CapturedError> {
    if matches!(context.get(EXCEPTION_KEY), Some(ContextValue::Error(_))) {
        match context.remove(EXCEPTION_KEY) {
            Some(ContextValue::Error(error)) => Some(error),
            _ => None,
        }
    } else {
        None
    }
}

/// Substitute `{key}` tokens with string-convertible context values,
/// consuming the entries that matched.
///
/// A single pass over the context's current entries decides the replacement
/// set; values rendering empty do not qualify and stay in the context. The
/// replacements are then applied in one left-to-right sweep over the message,
/// so substituted text is never re-scanned.
fn interpolate(message: &str, context: &mut LogContext) -> String {
    let mut replacements: Vec<(String, String)> = Vec::new();
    let mut consumed: Vec<String> = Vec::new();

    for (key, value) in context.iter() {
        let token = format!("{{{key}}}");
        if !message.contains(&token) {
            continue;
        }
        let Some(text) = value.as_text() else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        replacements.push((token, text));
        consumed.push(key.clone());
    }
    for key in consumed {
        context.remove(&key);
    }

    if replacements.is_empty() {
        return message.to_string();
    }

    // Longest token wins when one is a prefix of another.
    replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));

    let mut result = String::with_capacity(message.len());
    let mut rest = message;
    'sweep: while !rest.is_empty() {
        for (token, text) in &replacements {
            if rest.starts_with(token.as_str()) {
                result.push_str(text);
                rest = &rest[token.len()..];
                continue 'sweep;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }
    result
}
