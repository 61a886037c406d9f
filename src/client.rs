//! Capture capability and the file-backed client
//!
//! [`EventCapture`] is the narrow interface the logging adapter talks to: one
//! entry point for plain message events, one for exception events. The
//! production implementation, [`FileCaptureClient`], composes the wire-level
//! event, encodes it into the credential envelope and hands the result to an
//! injected [`PayloadSink`] instead of dialing the backend.

use crate::context::CapturedError;
use crate::dsn::Dsn;
use crate::errors::{SpoolError, SpoolResult};
use crate::normalize::{normalize_entry, normalize_map};
use crate::severity::Severity;
use crate::transport::PayloadSink;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Identifier assigned to every captured event.
pub type EventId = Uuid;

/// Reserved wire key for user context attached to an event.
pub const USER_CONTEXT_KEY: &str = "sentry.interfaces.User";

/// Normalized event skeleton carried into a capture call: severity plus the
/// optional reserved user slot and free-form extra data.
#[derive(Debug, Clone)]
pub struct EventData {
    level: Severity,
    user: Option<Value>,
    extra: Option<Map<String, Value>>,
}

impl EventData {
    pub fn new(level: Severity) -> Self {
        EventData {
            level,
            user: None,
            extra: None,
        }
    }

    /// Attach the reserved user context, normalized in place.
    pub fn with_user(mut self, user: Value) -> Self {
        self.user = Some(normalize_entry(&user, 0));
        self
    }

    /// Attach free-form extra data, normalized in place. The extra map sits
    /// one mapping level below the event data itself.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(normalize_map(&extra, 1));
        self
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    pub fn extra(&self) -> Option<&Map<String, Value>> {
        self.extra.as_ref()
    }

    /// Lay the skeleton out as the wire-level event map.
    fn into_event_map(self) -> Map<String, Value> {
        let mut event = Map::new();
        event.insert("level".to_string(), json!(self.level));
        if let Some(user) = self.user {
            event.insert(USER_CONTEXT_KEY.to_string(), user);
        }
        if let Some(extra) = self.extra {
            event.insert("extra".to_string(), Value::Object(extra));
        }
        event
    }
}

/// The backend's capture capability.
///
/// Both operations are synchronous and fail loud: an error from the sink or
/// the encoder aborts the capture and propagates to the logging caller.
pub trait EventCapture: Send + Sync {
    /// Submit a plain message event.
    fn capture_message(
        &self,
        message: &str,
        options: &Map<String, Value>,
        data: EventData,
    ) -> SpoolResult<EventId>;

    /// Submit an exception event. `message_hint` overrides the error's own
    /// message in the event headline.
    fn capture_exception(
        &self,
        error: &CapturedError,
        data: EventData,
        logger: Option<&str>,
        vars: Option<&Value>,
        message_hint: Option<&str>,
    ) -> SpoolResult<EventId>;
}

/// Capture client that spools events through a [`PayloadSink`].
pub struct FileCaptureClient {
    dsn: Dsn,
    sink: Box<dyn PayloadSink>,
}

impl FileCaptureClient {
    pub fn new(dsn: Dsn, sink: Box<dyn PayloadSink>) -> Self {
        FileCaptureClient { dsn, sink }
    }

    /// Encode an event into the credential envelope and persist it.
    ///
    /// The envelope is `{"secret", "key", "message"}` where `message` is the
    /// base64 encoding of the JSON-encoded event.
    fn send(&self, event: &Map<String, Value>) -> SpoolResult<()> {
        let encoded = serde_json::to_string(event)
            .map_err(|e| SpoolError::serialization("encoding event data", e))?;

        let envelope = json!({
            "secret": self.dsn.secret_key,
            "key": self.dsn.public_key,
            "message": BASE64.encode(encoded),
        });
        let payload = serde_json::to_string(&envelope)
            .map_err(|e| SpoolError::serialization("encoding event envelope", e))?;

        self.sink.persist(&payload)
    }

    fn stamp(event: &mut Map<String, Value>, event_id: EventId) {
        event.insert("event_id".to_string(), json!(event_id.simple().to_string()));
        event.insert(
            "timestamp".to_string(),
            json!(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        );
    }

    /// Exception interface: the captured error first, then its source chain.
    fn exception_values(error: &CapturedError) -> Value {
        let mut values = vec![json!({
            "type": error.type_name(),
            "value": error.message(),
        })];
        for cause in error.chain() {
            values.push(json!({"type": "cause", "value": cause}));
        }
        json!({ "values": values })
    }
}

impl EventCapture for FileCaptureClient {
    fn capture_message(
        &self,
        message: &str,
        options: &Map<String, Value>,
        data: EventData,
    ) -> SpoolResult<EventId> {
        let event_id = Uuid::new_v4();
        let mut event = data.into_event_map();
        Self::stamp(&mut event, event_id);
        event.insert("message".to_string(), json!(message));
        for (key, value) in options {
            event.entry(key.clone()).or_insert_with(|| value.clone());
        }

        self.send(&event)?;
        Ok(event_id)
    }

    fn capture_exception(
        &self,
        error: &CapturedError,
        data: EventData,
        logger: Option<&str>,
        vars: Option<&Value>,
        message_hint: Option<&str>,
    ) -> SpoolResult<EventId> {
        let event_id = Uuid::new_v4();
        let mut event = data.into_event_map();
        Self::stamp(&mut event, event_id);

        let headline = match message_hint {
            Some(hint) => format!("{}: {}", error.type_name(), hint),
            None => format!("{}: {}", error.type_name(), error.message()),
        };
        event.insert("message".to_string(), json!(headline));
        event.insert("exception".to_string(), Self::exception_values(error));
        if let Some(logger) = logger {
            event.insert("logger".to_string(), json!(logger));
        }
        if let Some(vars) = vars {
            event.insert("vars".to_string(), normalize_entry(vars, 0));
        }

        self.send(&event)?;
        Ok(event_id)
    }
}

/// No-op capture for tests and disabled logging.
pub struct NoopCapture;

impl EventCapture for NoopCapture {
    fn capture_message(
        &self,
        _message: &str,
        _options: &Map<String, Value>,
        _data: EventData,
    ) -> SpoolResult<EventId> {
        Ok(Uuid::new_v4())
    }

    fn capture_exception(
        &self,
        _error: &CapturedError,
        _data: EventData,
        _logger: Option<&str>,
        _vars: Option<&Value>,
        _message_hint: Option<&str>,
    ) -> SpoolResult<EventId> {
        Ok(Uuid::new_v4())
    }
}
