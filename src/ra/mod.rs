/// ra.co client layer: GraphQL transport, area resolution, event listings.
pub mod area;
pub mod client;
pub mod errors;
pub mod events;
pub mod model;

pub use client::{DEFAULT_ENDPOINT, HttpTransport, RaClient, Transport};
pub use errors::RaError;
pub use model::{Event, EventsResult, Resource};
