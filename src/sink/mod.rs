//! Log sinks: where a `PageSet` goes when it is logged instead of shown.

use std::io::Write;
use std::str::FromStr;

use unicode_width::UnicodeWidthStr;

use crate::error::{HoodError, Result};
use crate::models::PageSet;

/// Serializes a `PageSet` to a textual log destination.
pub trait LogSink {
    fn log_pages(&mut self, pages: &PageSet) -> Result<()>;

    /// Where the pages went, for user notices ("stdout", a path, ...).
    fn describe(&self) -> String;
}

/// Output format for writer-backed sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = HoodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(HoodError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

/// Render pages as aligned `label : value` blocks, one block per page.
pub fn render_text(pages: &PageSet) -> String {
    let mut out = String::new();
    for (i, page) in pages.pages().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("== {} ==\n", page.title()));
        let width = page.label_width();
        for entry in page.entries() {
            let pad = width.saturating_sub(entry.label().width());
            out.push_str(entry.label());
            out.push_str(&" ".repeat(pad));
            out.push_str(" : ");
            out.push_str(entry.value());
            out.push('\n');
        }
    }
    out
}

/// Writes the whole set to any `Write` (stdout, a file, a buffer).
pub struct WriterLogSink<W: Write> {
    writer: W,
    format: OutputFormat,
    name: String,
}

impl<W: Write> WriterLogSink<W> {
    pub fn new(writer: W, format: OutputFormat, name: impl Into<String>) -> Self {
        Self {
            writer,
            format,
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for WriterLogSink<W> {
    fn log_pages(&mut self, pages: &PageSet) -> Result<()> {
        match self.format {
            OutputFormat::Text => self.writer.write_all(render_text(pages).as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, pages)?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Emits one `tracing` event per entry under the `hood::pages` target.
/// Used in interactive mode, where the log file is the destination.
///
/// Fails when no subscriber would record those events, either because none
/// was installed or because a filter drops the target.
#[derive(Debug, Default)]
pub struct TracingLogSink {
    destination: String,
}

impl TracingLogSink {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

impl LogSink for TracingLogSink {
    fn log_pages(&mut self, pages: &PageSet) -> Result<()> {
        if !tracing::enabled!(target: "hood::pages", tracing::Level::INFO) {
            return Err(HoodError::Sink(format!(
                "no subscriber records hood::pages (expected {})",
                self.destination
            )));
        }
        tracing::info!(target: "hood::pages", pages = pages.len(), "page dump start");
        for page in pages.pages() {
            for entry in page.entries() {
                tracing::info!(
                    target: "hood::pages",
                    page = page.title(),
                    label = entry.label(),
                    value = entry.value(),
                );
            }
        }
        tracing::info!(target: "hood::pages", entries = pages.entry_count(), "page dump end");
        Ok(())
    }

    fn describe(&self) -> String {
        self.destination.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

    fn sample() -> PageSet {
        let mut set = PageSet::new();
        set.add_page("System").add("Host", "box").add("OS name", "linux");
        set.add_page("Empty");
        set
    }

    #[test]
    fn render_text_aligns_labels() {
        let text = render_text(&sample());
        assert_eq!(
            text,
            "== System ==\nHost    : box\nOS name : linux\n\n== Empty ==\n"
        );
    }

    #[test]
    fn render_text_empty_set() {
        assert_eq!(render_text(&PageSet::new()), "");
    }

    #[test]
    fn writer_sink_text() {
        let mut sink = WriterLogSink::new(Vec::new(), OutputFormat::Text, "buffer");
        sink.log_pages(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("== System =="));
    }

    #[test]
    fn writer_sink_json_is_parseable() {
        let mut sink = WriterLogSink::new(Vec::new(), OutputFormat::Json, "buffer");
        sink.log_pages(&sample()).unwrap();
        let out = sink.into_inner();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["pages"][0]["title"], "System");
        assert_eq!(value["pages"][0]["entries"][1]["label"], "OS name");
        assert_eq!(value["pages"][1]["entries"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn dump_with(filter: EnvFilter) -> (Result<()>, String) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );
        let mut sink = TracingLogSink::new("hood.log");
        let result = tracing::subscriber::with_default(subscriber, || sink.log_pages(&sample()));
        let out = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        (result, out)
    }

    #[test]
    fn tracing_sink_writes_under_warn_level() {
        let (result, out) = dump_with(crate::logging::filter("warn"));
        assert!(result.is_ok());
        assert!(out.contains("page dump start"));
        assert!(out.contains("OS name"));
    }

    #[test]
    fn tracing_sink_fails_when_target_is_filtered() {
        let (result, out) = dump_with(EnvFilter::new("warn"));
        let err = result.unwrap_err();
        assert!(matches!(err, HoodError::Sink(_)));
        assert!(err.to_string().contains("hood.log"));
        assert!(out.is_empty());
    }

    #[test]
    fn tracing_sink_fails_without_subscriber() {
        let mut sink = TracingLogSink::new("hood.log");
        let result = tracing::subscriber::with_default(
            tracing::subscriber::NoSubscriber::default(),
            || sink.log_pages(&sample()),
        );
        assert!(result.is_err());
        assert_eq!(sink.describe(), "hood.log");
    }
}
