use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use logquery_engine::EventBuffer;

use crate::record::CapturedEvent;

/// Field names whose values are treated as throwable information.
const EXCEPTION_FIELDS: &[&str] = &["error", "exception"];

/// A tracing layer that captures every emitted event into a shared buffer.
///
/// Stack it onto the application's subscriber; the layer never filters, so
/// level gating belongs to the layers and filters around it.
#[derive(Clone)]
pub struct CaptureLayer {
    buffer: Arc<EventBuffer<CapturedEvent>>,
}

impl CaptureLayer {
    pub fn new(buffer: Arc<EventBuffer<CapturedEvent>>) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.buffer.push(CapturedEvent {
            timestamp_millis: Utc::now().timestamp_millis(),
            level: metadata.level().as_str(),
            target: metadata.target().to_string(),
            message: visitor.message,
            // Filled in by materialize, inside push
            thread: String::new(),
            module: metadata.module_path(),
            file: metadata.file(),
            line: metadata.line(),
            span: ctx.lookup_current().map(|span| span.name()),
            exception: visitor.exception,
            properties: visitor.properties,
        });
    }
}

/// Visitor that splits an event's fields into the message, exception
/// frames, and string properties.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    exception: Option<Vec<String>>,
    properties: HashMap<String, String>,
}

impl EventVisitor {
    fn record_rendered(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name if EXCEPTION_FIELDS.contains(&name) => {
                self.exception = Some(value.lines().map(str::to_string).collect());
            }
            name => {
                self.properties.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_rendered(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_rendered(field, value.to_string());
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn std::error::Error + 'static)) {
        // An error-typed field is throwable information whatever its name;
        // render the cause chain one frame per line
        let mut frames = vec![value.to_string()];
        let mut source = value.source();
        while let Some(cause) = source {
            frames.push(cause.to_string());
            source = cause.source();
        }
        self.exception = Some(frames);
    }
}
