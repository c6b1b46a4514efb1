/// CLI argument definitions via clap derive.
use clap::{CommandFactory, Parser, ValueEnum};

use crate::ra::DEFAULT_ENDPOINT;

/// Area used when `--area` is not given.
pub const DEFAULT_AREA: &str = "hanoi";

/// raco-events — list upcoming ra.co events for an area and genres.
#[derive(Debug, Parser)]
#[command(
    name = "raco-events",
    about = "List upcoming ra.co events for an area, filtered by genre",
    version
)]
pub struct Cli {
    /// Genres to include; an event matching any of them is listed.
    /// Case-insensitive (e.g., techno house).
    #[arg(value_name = "GENRES")]
    pub genres: Vec<String>,

    /// Area name to search for (e.g., berlin, "new york").
    #[arg(short, long, value_name = "AREA", env = "RACO_AREA", default_value = DEFAULT_AREA)]
    pub area: String,

    /// Shorthand for --output json.
    #[arg(short, long, conflicts_with = "output")]
    pub json: bool,

    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Text layout. Ignored for JSON output.
    #[arg(long, value_name = "LAYOUT", default_value = "detailed")]
    pub layout: Layout,

    /// Print request details and timings to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// GraphQL endpoint.
    #[arg(long, value_name = "URL", env = "RACO_ENDPOINT", default_value = DEFAULT_ENDPOINT, hide = true)]
    pub endpoint: String,
}

impl Cli {
    /// Genres as sent upstream: trimmed, lowercased, blanks dropped.
    #[must_use]
    pub fn genres(&self) -> Vec<String> {
        self.genres
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// Area search term: trimmed and lowercased. Blank falls back to
    /// [`DEFAULT_AREA`].
    #[must_use]
    pub fn area_query(&self) -> String {
        let area = self.area.trim();
        if area.is_empty() {
            DEFAULT_AREA.to_owned()
        } else {
            area.to_lowercase()
        }
    }

    /// Rendered help text, as printed by `--help`.
    #[must_use]
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable event blocks with terminal hyperlinks.
    #[default]
    Text,
    /// JSON array (pretty-printed).
    Json,
    /// Newline-delimited JSON (one event per line).
    Ndjson,
}

/// Text layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Layout {
    /// Date with time range; venue, event, genres and artists all linked.
    #[default]
    Detailed,
    /// Date only; only the event name is linked.
    Compact,
}
