//! Tracing layer that forwards events to the browser console.
//!
//! The engine reports everything non-fatal (dropped input, store failures,
//! crowded displacement) through `tracing`. In the browser nothing reads
//! those events unless a subscriber is installed, so [`init`] registers a
//! [`ConsoleLayer`] once per module instance.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

type Writer = Box<dyn Fn(Level, &str) + Send + Sync>;

/// Formats each event as one line and hands it to a writer.
pub struct ConsoleLayer {
    max_level: Level,
    writer: Writer,
}

impl ConsoleLayer {
    /// Layer writing to `console.warn`/`console.error`/... by level.
    pub fn browser() -> Self {
        Self::with_writer(write_console)
    }

    pub fn with_writer(writer: impl Fn(Level, &str) + Send + Sync + 'static) -> Self {
        Self {
            max_level: Level::INFO,
            writer: Box::new(writer),
        }
    }

    /// Most verbose level forwarded. Defaults to `INFO`.
    #[must_use]
    pub fn max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        (self.writer)(*metadata.level(), &visitor.line(metadata.target()));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl EventVisitor {
    fn line(&self, target: &str) -> String {
        let mut line = format!("{target}: {}", self.message);
        for (name, value) in &self.fields {
            let _ = write!(line, " {name}={value}");
        }
        line
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    eprintln!("{level:>5} {line}");
}

/// Install the console layer as the global subscriber.
///
/// Returns `false` when a subscriber was already set, e.g. by a second
/// module instance on the same page.
pub fn init(max_level: Level) -> bool {
    tracing_subscriber::registry()
        .with(ConsoleLayer::browser().max_level(max_level))
        .try_init()
        .is_ok()
}
