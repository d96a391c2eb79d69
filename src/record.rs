use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Well-known field name under which hosts attach an error to an entry.
pub const ERROR_KEY: &str = "error";

/// Severity of an [`Entry`], ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Panic,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    /// Every level the host knows about, most severe first.
    pub const ALL: [Level; 7] = [
        Level::Panic,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

/// A single field value attached to an [`Entry`].
///
/// The set of variants is closed so every value has a well-defined BSON
/// form. Anything else that implements [`Serialize`] goes through
/// [`Value::serialized`].
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Time(DateTime<Utc>),
    /// An error object. Under [`ERROR_KEY`] it is stored as its description.
    Error(Arc<dyn Error + Send + Sync>),
    Bson(Bson),
}

impl Value {
    /// Serialize an arbitrary value into its BSON form up front.
    pub fn serialized<T>(value: &T) -> Result<Self, bson::ser::Error>
    where
        T: Serialize + ?Sized,
    {
        bson::to_bson(value).map(Value::Bson)
    }

    /// The error behind this value, if it is one.
    pub fn as_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Value::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Value::Null => Bson::Null,
            Value::Bool(v) => Bson::Boolean(*v),
            Value::I64(v) => Bson::Int64(*v),
            // BSON has no unsigned 64-bit type.
            Value::U64(v) => i64::try_from(*v)
                .map(Bson::Int64)
                .unwrap_or_else(|_| Bson::String(v.to_string())),
            Value::F64(v) => Bson::Double(*v),
            Value::Str(v) => Bson::String(v.clone()),
            Value::Time(v) => Bson::DateTime(bson::DateTime::from_millis(v.timestamp_millis())),
            Value::Error(err) => Bson::String(format!("{:?}", err)),
            Value::Bson(v) => v.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U64(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<Bson> for Value {
    fn from(v: Bson) -> Self {
        Value::Bson(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        // Only out-of-range unsigned integers fail; keep their text.
        bson::to_bson(&v)
            .map(Value::Bson)
            .unwrap_or_else(|_| Value::Str(v.to_string()))
    }
}

/// One emitted log record, as handed to a [`Hook`](crate::hook::Hook).
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: String,
    pub fields: BTreeMap<String, Value>,
}

impl Entry {
    /// Create an entry stamped with the current time and no fields.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Entry {
            level,
            time: Utc::now(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach `err` under [`ERROR_KEY`].
    pub fn with_error(mut self, err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.fields
            .insert(ERROR_KEY.to_string(), Value::Error(Arc::from(err.into())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_most_severe_first() {
        assert!(Level::Panic < Level::Fatal);
        assert!(Level::Error < Level::Warn);
        assert!(Level::Debug < Level::Trace);
        assert_eq!(Level::ALL.first(), Some(&Level::Panic));
    }

    #[test]
    fn tracing_levels_map_onto_host_levels() {
        assert_eq!(Level::from(&tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from(&tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(&tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn large_unsigned_values_keep_their_digits() {
        assert_eq!(Value::U64(7).to_bson(), Bson::Int64(7));
        assert_eq!(
            Value::U64(u64::MAX).to_bson(),
            Bson::String(u64::MAX.to_string())
        );
    }

    #[test]
    fn json_values_become_documents() {
        let value = Value::from(serde_json::json!({ "region": "eu", "retries": 3 }));
        match value.to_bson() {
            Bson::Document(doc) => {
                assert_eq!(doc.get_str("region").ok(), Some("eu"));
                assert!(matches!(
                    doc.get("retries"),
                    Some(Bson::Int32(3)) | Some(Bson::Int64(3))
                ));
            }
            other => panic!("expected a document, got {other:?}"),
        }
    }

    #[test]
    fn serialized_rejects_values_without_a_bson_form() {
        let mut by_port = BTreeMap::new();
        by_port.insert(8080, "http");
        assert!(Value::serialized(&by_port).is_err());
    }

    #[test]
    fn with_error_stores_an_error_value() {
        let entry = Entry::new(Level::Error, "boom").with_error("timeout");
        let value = entry.fields.get(ERROR_KEY).expect("error field");
        assert_eq!(value.as_error().map(|e| e.to_string()).as_deref(), Some("timeout"));
    }
}
