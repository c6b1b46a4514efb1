/// The events listing: resolve the area, fetch the first page, render it.
use tracing::{debug, info};

use super::RunError;
use crate::cli::output::{RenderStatus, write_events};
use crate::cli::{Cli, OutputCtx};
use crate::diag::Diagnostics;
use crate::ra::{EventsResult, HttpTransport, RaClient, RaError, Transport};

/// Run `raco-events <GENRES>...` against the configured endpoint.
///
/// # Errors
///
/// See [`run_with`]; also `RunError::Ra` if the HTTP client cannot be built.
pub fn run(cli: &Cli, ctx: &OutputCtx, diag: Diagnostics) -> Result<RenderStatus, RunError> {
    let transport = HttpTransport::new(&cli.endpoint)?;
    let client = RaClient::new(transport, diag);
    run_with(&client, cli, ctx)
}

/// Validate the genres, fetch, and write the results to stdout.
///
/// No request is sent when no genre was given.
///
/// # Errors
///
/// - `RunError::Usage` if no genre was given
/// - `RunError::Ra` if area resolution or either request fails
/// - `RunError::Output` if stdout cannot be written
pub fn run_with<T: Transport>(
    client: &RaClient<T>,
    cli: &Cli,
    ctx: &OutputCtx,
) -> Result<RenderStatus, RunError> {
    let genres = cli.genres();
    if genres.is_empty() {
        return Err(RunError::Usage("No genre specified"));
    }

    let result = fetch(client, &cli.area_query(), &genres)?;
    Ok(write_events(&result.events, ctx)?)
}

/// Resolve `area_query`, then fetch page 1 of its events for `genres`.
///
/// The listing request is only sent once the area has resolved.
///
/// # Errors
///
/// Returns the first `RaError` encountered, unchanged.
pub fn fetch<T: Transport>(
    client: &RaClient<T>,
    area_query: &str,
    genres: &[String],
) -> Result<EventsResult, RaError> {
    let area = client.area(area_query)?;
    client.diag().scope(|| {
        info!(area = %area.name, country = %area.country, ?genres, "listing events");
    });

    let result = client.events(area.id, genres, 1)?;
    if result.total > result.events.len() as u64 {
        client.diag().scope(|| {
            debug!(
                shown = result.events.len(),
                total = result.total,
                "more events upstream than fit on one page"
            );
        });
    }
    Ok(result)
}
