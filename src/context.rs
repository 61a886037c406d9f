//! Structured context passed alongside a log message
//!
//! A context is an ordered mapping from string keys to [`ContextValue`]s.
//! The value kinds mirror what the logging contract actually distinguishes:
//! plain text, objects that can render themselves as text, arbitrary
//! structured data, and captured errors. Whether a value may be interpolated
//! into the message is a capability of the value ([`ContextValue::as_text`]),
//! checked at interpolation time.

use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Context mapping carried by a single log call.
pub type LogContext = BTreeMap<String, ContextValue>;

/// An error value captured into a log context.
///
/// The concrete type name is recorded at capture time; Rust has no runtime
/// class lookup, so this is the only place it is still known. The source
/// chain is walked eagerly into rendered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    type_name: &'static str,
    message: String,
    chain: Vec<String>,
}

impl CapturedError {
    /// Capture an error value, recording its type name, display message and
    /// rendered source chain.
    pub fn from_error<E: Error>(error: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        CapturedError {
            type_name: std::any::type_name::<E>(),
            message: error.to_string(),
            chain,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rendered messages of the error's `source()` chain, outermost first.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

/// A single context entry value.
pub enum ContextValue {
    /// Plain text; eligible for placeholder interpolation.
    Text(String),
    /// A value that renders itself as text on demand; eligible for
    /// placeholder interpolation.
    Display(Box<dyn fmt::Display + Send + Sync>),
    /// Arbitrary structured data; never interpolated.
    Data(Value),
    /// A captured error value; drives the exception capture path when stored
    /// under the `exception` key.
    Error(CapturedError),
}

impl ContextValue {
    /// Capture an error value into a context entry.
    pub fn error<E: Error>(error: &E) -> Self {
        ContextValue::Error(CapturedError::from_error(error))
    }

    /// Wrap a lazily rendered value.
    pub fn display(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        ContextValue::Display(Box::new(value))
    }

    /// The string-convertibility check used by placeholder interpolation.
    ///
    /// Returns the rendered text for `Text` and `Display` values; structured
    /// data and errors never qualify.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ContextValue::Text(s) => Some(s.clone()),
            ContextValue::Display(d) => Some(d.to_string()),
            ContextValue::Data(_) | ContextValue::Error(_) => None,
        }
    }

    /// Convert the value into plain JSON for the outgoing event.
    pub fn to_value(&self) -> Value {
        match self {
            ContextValue::Text(s) => Value::String(s.clone()),
            ContextValue::Display(d) => Value::String(d.to_string()),
            ContextValue::Data(v) => v.clone(),
            ContextValue::Error(e) => Value::String(e.to_string()),
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ContextValue::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
            ContextValue::Data(v) => f.debug_tuple("Data").field(v).finish(),
            ContextValue::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        ContextValue::Data(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Outer;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("outer failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&Inner)
        }
    }

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("inner cause")
        }
    }

    impl Error for Inner {}

    #[test]
    fn text_and_display_are_string_convertible() {
        assert_eq!(
            ContextValue::from("plain").as_text().as_deref(),
            Some("plain")
        );
        assert_eq!(
            ContextValue::display(42u32).as_text().as_deref(),
            Some("42")
        );
    }

    #[test]
    fn data_and_errors_are_not_string_convertible() {
        assert!(ContextValue::Data(json!(["a", "b"])).as_text().is_none());
        assert!(ContextValue::error(&Inner).as_text().is_none());
    }

    #[test]
    fn captured_error_records_type_and_chain() {
        let captured = CapturedError::from_error(&Outer);
        assert_eq!(captured.type_name(), std::any::type_name::<Outer>());
        assert_eq!(captured.message(), "outer failed");
        assert_eq!(captured.chain(), ["inner cause".to_string()]);
    }
}
