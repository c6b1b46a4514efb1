/// Event listings: query construction and mapping of the upstream page into
/// flat [`Event`] records.
///
/// Filtering and sorting are requested from the server; nothing is filtered
/// or reordered locally. Only the requested page is fetched.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::client::{RaClient, Transport};
use super::errors::RaError;
use super::model::{Event, EventsResult, ORIGIN, Resource};

/// Listings per page. Fixed by this client.
pub const PAGE_SIZE: u32 = 50;

const LISTINGS_QUERY: &str = r"
query GET_EVENT_LISTINGS(
  $filters: FilterInputDtoInput,
  $filterOptions: FilterOptionsInputDtoInput,
  $page: Int,
  $pageSize: Int,
  $sort: SortInputDtoInput
) {
  eventListings(filters: $filters, filterOptions: $filterOptions, pageSize: $pageSize, page: $page, sort: $sort) {
    data {
      listingDate
      event {
        title
        contentUrl
        startTime
        endTime
        attending
        genres {
          name
          contentUrl
        }
        images {
          filename
          type
        }
        venue {
          name
          contentUrl
          live
        }
        artists {
          name
          contentUrl
        }
      }
    }
    totalResults
  }
}
";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingsData {
    event_listings: ListingsPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingsPage {
    data: Vec<ListingDoc>,
    total_results: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingDoc {
    listing_date: String,
    event: EventDoc,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDoc {
    title: String,
    content_url: String,
    start_time: String,
    end_time: String,
    attending: Option<u64>,
    genres: Option<Vec<LinkDoc>>,
    images: Option<Vec<ImageDoc>>,
    venue: LinkDoc,
    artists: Option<Vec<LinkDoc>>,
}

/// Any upstream entity with a display name and a path on the site.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkDoc {
    name: String,
    content_url: String,
}

#[derive(Debug, Deserialize)]
struct ImageDoc {
    filename: String,
}

impl<T: Transport> RaClient<T> {
    /// Fetch one page of upcoming events in an area, listed from today on.
    ///
    /// "Today" is the local calendar date at call time.
    ///
    /// # Errors
    ///
    /// Returns any transport or GraphQL error unchanged, or
    /// `RaError::MalformedResponse` if a listing cannot be mapped.
    pub fn events(
        &self,
        area_id: i64,
        genres: &[String],
        page: u32,
    ) -> Result<EventsResult, RaError> {
        self.events_since(area_id, genres, page, Local::now().date_naive())
    }

    /// Like [`RaClient::events`], with an explicit earliest listing date.
    ///
    /// # Errors
    ///
    /// See [`RaClient::events`].
    pub fn events_since(
        &self,
        area_id: i64,
        genres: &[String],
        page: u32,
        from: NaiveDate,
    ) -> Result<EventsResult, RaError> {
        let variables = build_variables(area_id, genres, page, from);
        let data: ListingsData = self.query("eventListings", LISTINGS_QUERY, variables)?;

        let total = data.event_listings.total_results;
        let events = map_listings(data.event_listings.data)?;
        self.diag().scope(|| {
            debug!(page, returned = events.len(), total, "fetched event listings");
        });

        Ok(EventsResult { events, total })
    }
}

/// Build the `eventListings` variables.
///
/// Genres are OR-ed upstream. Sort: listing date ascending, then relevance
/// score descending, then title ascending.
#[must_use]
pub fn build_variables(area_id: i64, genres: &[String], page: u32, from: NaiveDate) -> Value {
    json!({
        "filters": {
            "areas": { "eq": area_id },
            "listingDate": { "gte": from.format("%Y-%m-%d").to_string() },
            "genre": { "any": genres },
        },
        "filterOptions": {
            "genre": true,
            "eventType": true,
        },
        "pageSize": PAGE_SIZE,
        "page": page,
        "sort": {
            "listingDate": { "order": "ASCENDING" },
            "score": { "order": "DESCENDING" },
            "titleKeyword": { "order": "ASCENDING" },
        },
    })
}

fn map_listings(listings: Vec<ListingDoc>) -> Result<Vec<Event>, RaError> {
    listings.into_iter().map(map_listing).collect()
}

fn map_listing(listing: ListingDoc) -> Result<Event, RaError> {
    let ev = listing.event;
    let date = parse_timestamp("listingDate", &listing.listing_date)?.date();
    let start = parse_timestamp("startTime", &ev.start_time)?;
    let end = parse_timestamp("endTime", &ev.end_time)?;

    Ok(Event {
        name: ev.title,
        url: format!("{ORIGIN}{}", ev.content_url),
        date,
        time: (start, end),
        venue: ev.venue.into_resource(),
        genres: into_resources(ev.genres),
        artists: into_resources(ev.artists),
        attending: ev.attending.unwrap_or(0),
        // Filenames are kept as-is; unlike every other link they get no origin.
        image_urls: ev
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.filename)
            .collect(),
    })
}

impl LinkDoc {
    fn into_resource(self) -> Resource {
        Resource::from_path(self.name, &self.content_url)
    }
}

fn into_resources(docs: Option<Vec<LinkDoc>>) -> Vec<Resource> {
    docs.unwrap_or_default()
        .into_iter()
        .map(LinkDoc::into_resource)
        .collect()
}

/// Parse an upstream timestamp, keeping its wall-clock value.
///
/// Accepts `2024-05-10T22:00:00.000`, the same with a `Z` or `+07:00`
/// suffix, or a bare `2024-05-10` (midnight).
fn parse_timestamp(field: &str, raw: &str) -> Result<NaiveDateTime, RaError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(RaError::MalformedResponse(format!(
        "{field} '{raw}' is not an ISO-8601 timestamp"
    )))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diag::Diagnostics;
    use crate::ra::client::stub::StubTransport;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn listing(title: &str, attending: Value) -> Value {
        json!({
            "listingDate": "2024-05-10T00:00:00.000Z",
            "event": {
                "title": title,
                "contentUrl": "/events/1900001",
                "startTime": "2024-05-10T22:00:00.000",
                "endTime": "2024-05-11T04:00:00.000",
                "attending": attending,
                "genres": [
                    {"name": "Techno", "contentUrl": "/genres/techno"},
                    {"name": "House", "contentUrl": "/genres/house"}
                ],
                "images": [
                    {"filename": "https://images.ra.co/flyer-front.jpg", "type": "FLYERFRONT"}
                ],
                "venue": {"name": "Savage", "contentUrl": "/clubs/123456", "live": true},
                "artists": [
                    {"name": "DJ One", "contentUrl": "/dj/djone"}
                ]
            }
        })
    }

    fn page(listings: Vec<Value>, total: u64) -> Value {
        json!({
            "eventListings": {
                "data": listings,
                "totalResults": total
            }
        })
    }

    fn client(data: Value) -> RaClient<StubTransport> {
        RaClient::new(StubTransport::new(data), Diagnostics::silent())
    }

    #[test]
    fn test_variables_shape() {
        let genres = vec!["techno".to_owned(), "house".to_owned()];
        let v = build_variables(34, &genres, 1, day(2024, 3, 7));
        assert_eq!(v["filters"]["areas"]["eq"], 34);
        assert_eq!(v["filters"]["listingDate"]["gte"], "2024-03-07");
        assert_eq!(v["filters"]["genre"]["any"], json!(["techno", "house"]));
        assert_eq!(v["filterOptions"], json!({"genre": true, "eventType": true}));
        assert_eq!(v["pageSize"], 50);
        assert_eq!(v["page"], 1);
        assert_eq!(v["sort"]["listingDate"]["order"], "ASCENDING");
        assert_eq!(v["sort"]["score"]["order"], "DESCENDING");
        assert_eq!(v["sort"]["titleKeyword"]["order"], "ASCENDING");
    }

    #[test]
    fn test_sort_key_order() {
        let v = build_variables(1, &["techno".to_owned()], 1, day(2024, 1, 1));
        let keys: Vec<&str> = v["sort"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["listingDate", "score", "titleKeyword"]);
    }

    #[test]
    fn test_maps_every_listing() {
        let c = client(page(
            vec![listing("A", json!(12)), listing("B", json!(3))],
            2,
        ));
        let result = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.total, 2);
        assert_eq!(result.events[0].name, "A");
        assert_eq!(result.events[1].name, "B");
    }

    #[test]
    fn test_total_may_exceed_page() {
        let c = client(page(vec![listing("A", json!(1))], 137));
        let result = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.total, 137);
    }

    #[test]
    fn test_urls_prefixed_with_origin() {
        let c = client(page(vec![listing("A", json!(12))], 1));
        let ev = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap()
            .events
            .remove(0);
        assert_eq!(ev.url, "https://ra.co/events/1900001");
        assert_eq!(ev.venue.url, "https://ra.co/clubs/123456");
        assert_eq!(ev.venue.name, "Savage");
        assert_eq!(ev.genres[0].url, "https://ra.co/genres/techno");
        assert_eq!(ev.genres[1].name, "House");
        assert_eq!(ev.artists[0].url, "https://ra.co/dj/djone");
    }

    #[test]
    fn test_images_keep_raw_filenames() {
        let c = client(page(vec![listing("A", json!(12))], 1));
        let ev = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap()
            .events
            .remove(0);
        assert_eq!(ev.image_urls, vec!["https://images.ra.co/flyer-front.jpg"]);
        assert!(!ev.image_urls[0].starts_with("https://ra.co"));
    }

    #[test]
    fn test_attendance_defaults_to_zero() {
        let mut missing = listing("missing", Value::Null);
        missing["event"].as_object_mut().unwrap().remove("attending");
        let c = client(page(
            vec![
                listing("null", Value::Null),
                listing("zero", json!(0)),
                missing,
                listing("some", json!(42)),
            ],
            4,
        ));
        let events = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap()
            .events;
        let attending: Vec<u64> = events.iter().map(|e| e.attending).collect();
        assert_eq!(attending, vec![0, 0, 0, 42]);
    }

    #[test]
    fn test_dates_and_times() {
        let c = client(page(vec![listing("A", json!(1))], 1));
        let ev = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap()
            .events
            .remove(0);
        assert_eq!(ev.date, day(2024, 5, 10));
        assert_eq!(ev.time.0, day(2024, 5, 10).and_hms_opt(22, 0, 0).unwrap());
        assert_eq!(ev.time.1, day(2024, 5, 11).and_hms_opt(4, 0, 0).unwrap());
    }

    #[test]
    fn test_null_lists_map_to_empty() {
        let mut l = listing("A", json!(1));
        l["event"]["genres"] = Value::Null;
        l["event"]["artists"] = Value::Null;
        l["event"]["images"] = Value::Null;
        let c = client(page(vec![l], 1));
        let ev = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap()
            .events
            .remove(0);
        assert!(ev.genres.is_empty());
        assert!(ev.artists.is_empty());
        assert!(ev.image_urls.is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let mut l = listing("A", json!(1));
        l["event"]["startTime"] = json!("tomorrow-ish");
        let c = client(page(vec![l], 1));
        let err = c
            .events_since(34, &["techno".to_owned()], 1, day(2024, 5, 1))
            .unwrap_err();
        assert!(matches!(err, RaError::MalformedResponse(ref m) if m.contains("startTime")));
    }

    #[test]
    fn test_request_carries_filters() {
        let c = client(page(vec![], 0));
        let result = c
            .events_since(7, &["disco".to_owned()], 2, day(2025, 12, 31))
            .unwrap();
        assert!(result.events.is_empty());
        let seen = c.transport().seen.borrow().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["filters"]["areas"]["eq"], 7);
        assert_eq!(seen[0]["filters"]["listingDate"]["gte"], "2025-12-31");
        assert_eq!(seen[0]["page"], 2);
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = day(2024, 5, 10).and_hms_opt(22, 0, 0).unwrap();
        assert_eq!(parse_timestamp("t", "2024-05-10T22:00:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp("t", "2024-05-10T22:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("t", "2024-05-10T22:00:00.000Z").unwrap(), expected);
        assert_eq!(parse_timestamp("t", "2024-05-10T22:00:00+07:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("t", "2024-05-10").unwrap(),
            day(2024, 5, 10).and_time(NaiveTime::MIN)
        );
    }
}
