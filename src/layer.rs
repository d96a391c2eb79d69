use crate::hook::Hook;
use crate::record::{Entry, Level, Value};
use chrono::Utc;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::{Event, Subscriber};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns events into [`Entry`]s and fires
/// a [`Hook`] with them.
///
/// Only events whose level is in [`Hook::levels`] reach the hook. The hook
/// runs synchronously on the thread that emitted the event. A failed fire
/// is reported on stderr and counted; it never goes back through `tracing`.
pub struct HookLayer<H> {
    hook: H,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Events handed to the hook.
    pub fired_events: Arc<AtomicU64>,
    /// Events the hook returned an error for.
    pub failed_events: Arc<AtomicU64>,
}

impl<H: Hook> HookLayer<H> {
    pub fn new(hook: H) -> Self {
        Self {
            hook,
            total_events: Arc::new(AtomicU64::new(0)),
            fired_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<S, H> Layer<S> for HookLayer<H>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    H: Hook + 'static,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let level = Level::from(event.metadata().level());
        if !self.hook.levels().contains(&level) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let entry = Entry {
            level,
            time: Utc::now(),
            message: message.unwrap_or_default(),
            fields,
        };

        self.fired_events.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.hook.fire(&entry) {
            self.failed_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("failed to fire log hook: {}", e);
        }
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        let captured = CapturedError {
            description: value.to_string(),
            debug: format!("{:?}", value),
        };
        self.fields.insert(field.name().to_string(), Value::Error(Arc::new(captured)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), Value::Str(format!("{:?}", value)));
        }
    }
}

/// Owned snapshot of an error recorded on an event. The original is only
/// borrowed for the duration of the visit.
struct CapturedError {
    description: String,
    debug: String,
}

impl fmt::Debug for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug)
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl Error for CapturedError {}
