/// Output formatting: text blocks with terminal hyperlinks, JSON, NDJSON.
///
/// The detailed text layout is the canonical one: it shows the time range and
/// links every venue, genre and artist. The compact layout drops the time
/// range and links only the event name.
use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use serde::Serialize;

use super::args::{Layout, OutputFormat};
use crate::ra::{Event, Resource};
use crate::types::ErrorOutput;

/// Separator between the segments of an event's summary line.
const SEP: &str = "  \u{338} ";

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all formatters.
#[derive(Debug)]
pub struct OutputCtx {
    pub format: OutputFormat,
    pub layout: Layout,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, layout: Layout) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            layout,
        }
    }

    /// Whether errors should be written as a JSON envelope.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.format != OutputFormat::Text
    }
}

/// What a render pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Output was written (possibly an empty JSON list).
    Rendered,
    /// Text mode had nothing to show; the caller should exit non-zero.
    Empty,
}

// --- Events ---

/// Write events to stdout.
///
/// # Errors
///
/// See [`write_events_to`].
pub fn write_events(events: &[Event], ctx: &OutputCtx) -> io::Result<RenderStatus> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_events_to(&mut out, events, ctx)
}

/// Render events into `out`, treating a closed pipe (`| head`) as success.
///
/// # Errors
///
/// Returns any other I/O or serialization error from [`render_events`].
pub fn write_events_to<W: Write>(
    out: &mut W,
    events: &[Event],
    ctx: &OutputCtx,
) -> io::Result<RenderStatus> {
    match render_events(out, events, ctx) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(RenderStatus::Rendered),
        other => other,
    }
}

/// Render events into `out` in the context's format.
///
/// # Errors
///
/// Returns any I/O error from `out`, or a serialization error as `io::Error`.
pub fn render_events<W: Write>(
    out: &mut W,
    events: &[Event],
    ctx: &OutputCtx,
) -> io::Result<RenderStatus> {
    match ctx.format {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(events)?;
            writeln!(out, "{s}")?;
        }
        OutputFormat::Ndjson => print_ndjson(out, events)?,
        OutputFormat::Text => {
            if events.is_empty() {
                writeln!(out, "No events found")?;
                return Ok(RenderStatus::Empty);
            }
            for event in events {
                writeln!(out, "{}", format_event(event, ctx.layout))?;
                writeln!(out)?;
            }
        }
    }
    Ok(RenderStatus::Rendered)
}

/// Format one event as a block of two or three lines (no trailing newline).
#[must_use]
pub fn format_event(event: &Event, layout: Layout) -> String {
    match layout {
        Layout::Detailed => format_detailed(event),
        Layout::Compact => format_compact(event),
    }
}

fn format_detailed(event: &Event) -> String {
    let date = event.date.format("%b %-d, %Y");
    let from = event.time.0.format("%-I %p");
    let to = event.time.1.format("%-I %p");

    let mut lines = vec![format!(
        "{} {}{}",
        format!("🗓️  {date}").bold(),
        format!("({from} - {to})").bright_black(),
        venue_segment(event),
    )];

    let genres = join_links(&event.genres);
    lines.push(format!(
        "   {} {}",
        terminal_link(&event.name, &event.url).bold(),
        format!("[{genres}]").bright_black(),
    ));

    if !event.artists.is_empty() {
        lines.push(format!("   {}", join_links(&event.artists)));
    }
    lines.join("\n")
}

fn format_compact(event: &Event) -> String {
    let date = event.date.format("%b %-d, %Y");

    let mut lines = vec![format!(
        "{}{SEP}📍 {}{}",
        format!("🗓️  {date}").bold(),
        event.venue.name,
        attending_segment(event.attending),
    )];

    let genres = join_names(&event.genres);
    lines.push(format!(
        "   {} {}",
        terminal_link(&event.name, &event.url).bold(),
        format!("[{genres}]").bright_black(),
    ));

    if !event.artists.is_empty() {
        lines.push(format!("   {}", join_names(&event.artists)));
    }
    lines.join("\n")
}

/// Venue link and attendance, styled grey and bold.
fn venue_segment(event: &Event) -> ColoredString {
    format!(
        "{SEP}📍 {}{}",
        link(&event.venue),
        attending_segment(event.attending)
    )
    .bright_black()
    .bold()
}

fn attending_segment(attending: u64) -> String {
    if attending > 0 {
        format!("{SEP}👤 {attending}")
    } else {
        String::new()
    }
}

fn link(resource: &Resource) -> String {
    terminal_link(&resource.name, &resource.url)
}

fn join_links(resources: &[Resource]) -> String {
    resources.iter().map(link).collect::<Vec<_>>().join(", ")
}

fn join_names(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wrap `title` in an OSC 8 hyperlink to `url`.
#[must_use]
pub fn terminal_link(title: &str, url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{title}\x1b]8;;\x1b\\")
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, ctx: &OutputCtx) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if ctx.is_structured() {
        let s = serde_json::to_string_pretty(err).unwrap_or_default();
        let _ = writeln!(out, "{s}");
    } else {
        let _ = writeln!(out, "{} {}", "Error:".red(), err.error.message);
    }
}

/// Write a usage error and the help text to stderr.
pub fn write_usage_error(message: &str, usage: &str) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "{} {message}", "Error:".red());
    let _ = writeln!(out);
    let _ = write!(out, "{usage}");
}

// --- Generic JSON helpers ---

fn print_ndjson<W: Write, T: Serialize>(out: &mut W, values: &[T]) -> io::Result<()> {
    for v in values {
        let s = serde_json::to_string(v)?;
        writeln!(out, "{s}")?;
    }
    Ok(())
}
