/// Normalized records produced from upstream responses.
///
/// These are what the renderer consumes and what `--json` serializes. The raw
/// upstream shapes live next to the queries that fetch them.
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Origin prefixed to every upstream `contentUrl` path fragment.
pub const ORIGIN: &str = "https://ra.co";

/// A geographic area known to the events API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Upstream area id, used as the listing filter key.
    pub id: i64,
    /// Display name (e.g., "Hanoi").
    pub name: String,
    /// Country display name.
    pub country: String,
}

/// Any linkable upstream entity: venue, genre, artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

impl Resource {
    /// Build a resource from an upstream path fragment.
    ///
    /// The fragment is appended to [`ORIGIN`] as-is, malformed or not.
    #[must_use]
    pub fn from_path(name: impl Into<String>, path: &str) -> Self {
        Self {
            name: name.into(),
            url: format!("{ORIGIN}{path}"),
        }
    }
}

/// One upcoming event, flattened from an upstream listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event title.
    pub name: String,
    /// Canonical event page.
    pub url: String,
    /// Calendar day the event is listed under.
    pub date: NaiveDate,
    /// Start and end, as upstream wall-clock times. Not validated for order.
    pub time: (NaiveDateTime, NaiveDateTime),
    pub venue: Resource,
    pub genres: Vec<Resource>,
    pub artists: Vec<Resource>,
    /// Number of users marked as attending; 0 when upstream has none.
    pub attending: u64,
    /// Upstream image filenames, not prefixed with [`ORIGIN`].
    #[serde(rename = "imageURLs")]
    pub image_urls: Vec<String>,
}

/// A single page of events plus the upstream total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResult {
    pub events: Vec<Event>,
    /// Total matches upstream; may exceed `events.len()`.
    pub total: u64,
}
