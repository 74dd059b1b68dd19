//! Console rendering of log events.
//!
//! INFO events are the "Doing X... Done!" status lines and go to stdout
//! untagged. Every other level is tagged and goes to stderr. Structured
//! fields follow the message as `key=value`. Anything the user must see
//! regardless of `-q` (listings, prompts) is printed directly, not logged.

use std::{
    fmt::{self, Debug},
    io,
};

use nu_ansi_term::Color::{Blue, Magenta, Red, Yellow};
use tracing::{
    field::{Field, Visit},
    Event, Level, Metadata, Subscriber,
};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    registry::LookupSpan,
};

use crate::{cli::Args, progress, utils::Colored};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn for_level(level: &Level) -> Self {
        if *level == Level::INFO {
            Self::Stdout
        } else {
            Self::Stderr
        }
    }
}

fn level_tag(level: &Level) -> Option<Colored<&'static str>> {
    match *level {
        Level::TRACE => Some(Colored(Magenta, "[TRACE]")),
        Level::DEBUG => Some(Colored(Blue, "[DEBUG]")),
        Level::INFO => None,
        Level::WARN => Some(Colored(Yellow, "[WARN]")),
        Level::ERROR => Some(Colored(Red, "[ERROR]")),
    }
}

/// The message of an event plus its other fields rendered as `key=value`.
#[derive(Default)]
struct EventText {
    message: String,
    fields: Vec<String>,
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

pub struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut text = EventText::default();
        event.record(&mut text);

        if let Some(tag) = level_tag(event.metadata().level()) {
            write!(writer, "{tag} ")?;
        }
        write!(writer, "{}", text.message)?;
        for field in &text.fields {
            write!(writer, " {field}")?;
        }
        writeln!(writer)
    }
}

/// One formatted event, printed to its stream on drop with the progress
/// display suspended.
struct ConsoleLine {
    stream: Stream,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy(&self.buffer);
        let text = text.trim_end_matches('\n');
        progress::suspend(|| {
            match self.stream {
                Stream::Stdout => println!("{text}"),
                Stream::Stderr => eprintln!("{text}"),
            }
        });
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine {
            stream: Stream::Stdout,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine {
            stream: Stream::for_level(meta.level()),
            buffer: Vec::new(),
        }
    }
}

fn filter_level(args: &Args) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

pub fn setup_logging(args: &Args) {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(format!("pkgview={}", filter_level(args)))
        .with_writer(Console)
        .event_format(ConsoleFormat)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("A global tracing subscriber was already installed");
    }
}
