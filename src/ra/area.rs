/// Area resolution: free-text area name to upstream area id.
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::client::{RaClient, Transport};
use super::errors::RaError;
use super::model::Area;

const AREA_QUERY: &str = r"
query($query: String!) {
  areas(searchTerm: $query, limit: 1) {
    id
    name
    country {
      name
    }
  }
}
";

#[derive(Debug, Deserialize)]
struct AreasData {
    areas: Vec<AreaDoc>,
}

#[derive(Debug, Deserialize)]
struct AreaDoc {
    id: IdDoc,
    name: String,
    country: CountryDoc,
}

#[derive(Debug, Deserialize)]
struct CountryDoc {
    name: String,
}

/// Upstream ids are declared as `ID`, which serializes as a string, but
/// numeric ids are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdDoc {
    Number(i64),
    Text(String),
}

impl IdDoc {
    fn parse(&self) -> Result<i64, RaError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| RaError::MalformedResponse(format!("area id '{s}' is not an integer"))),
        }
    }
}

impl<T: Transport> RaClient<T> {
    /// Resolve an area name to the best upstream match.
    ///
    /// # Errors
    ///
    /// - `RaError::AreaNotFound` — the search returned no areas
    /// - any transport or GraphQL error, unchanged
    pub fn area(&self, query: &str) -> Result<Area, RaError> {
        let data: AreasData = self.query("areas", AREA_QUERY, json!({ "query": query }))?;
        let area = first_area(data, query)?;
        self.diag().scope(|| {
            debug!(id = area.id, name = %area.name, country = %area.country, "resolved area");
        });
        Ok(area)
    }
}

fn first_area(data: AreasData, query: &str) -> Result<Area, RaError> {
    let doc = data
        .areas
        .into_iter()
        .next()
        .ok_or_else(|| RaError::AreaNotFound {
            query: query.to_owned(),
        })?;

    Ok(Area {
        id: doc.id.parse()?,
        name: doc.name,
        country: doc.country.name,
    })
}
