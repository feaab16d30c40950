//! Run log
//!
//! Every INFO-or-higher event is appended to `ocr.log` as one timestamped line.
//! The file is opened per event and closed right after the write, so nothing
//! holds it between events. A second layer mirrors events to stderr, filtered
//! by `RUST_LOG`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use scanhook_config::Workspace;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::writer::{EitherWriter, MakeWriter};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opens the log file in append mode for each event
#[derive(Debug, Clone)]
pub struct AppendFile {
    path: PathBuf,
}

impl AppendFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl<'a> MakeWriter<'a> for AppendFile {
    type Writer = EitherWriter<File, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            Ok(file) => EitherWriter::A(file),
            // Logging must never take the run down
            Err(_) => EitherWriter::B(io::sink()),
        }
    }
}

/// `<timestamp> - [Error: |Warning: ]<message>`
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - ",
            chrono::Local::now().format(TIMESTAMP_FORMAT)
        )?;

        match *event.metadata().level() {
            Level::ERROR => write!(writer, "Error: ")?,
            Level::WARN => write!(writer, "Warning: ")?,
            _ => {}
        }

        let mut message = String::new();
        ctx.field_format()
            .format_fields(Writer::new(&mut message), event)?;
        write!(writer, "{}", single_line(&message))?;

        writeln!(writer)
    }
}

/// Escape line breaks so one event stays one line
pub fn single_line(message: &str) -> String {
    message
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
}

/// Layer appending to `path`
pub fn file_layer<S>(path: impl Into<PathBuf>) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .event_format(LogLineFormat)
        .with_writer(AppendFile::new(path))
        .with_ansi(false)
        .with_filter(LevelFilter::INFO)
}

/// Install the global subscriber: `ocr.log` plus stderr
pub fn init(workspace: &Workspace, verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "warn" };
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    tracing_subscriber::registry()
        .with(file_layer(workspace.log_path()))
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}
