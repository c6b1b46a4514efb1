/// GraphQL transport and the client handle shared by the area and event queries.
use reqwest::blocking::Client;
use reqwest::header::REFERER;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::RaError;
use super::model::ORIGIN;
use crate::diag::Diagnostics;

/// Default GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ra.co/graphql";

const USER_AGENT: &str = concat!("raco-events/", env!("CARGO_PKG_VERSION"));

/// A GraphQL POST body.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// Something that can execute a GraphQL request and hand back its `data`.
pub trait Transport {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns `RaError` for transport failures, HTTP errors, GraphQL errors,
    /// or a response without `data`.
    fn execute(&self, request: &GraphQlRequest<'_>) -> Result<Value, RaError>;
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport for the given endpoint URL.
    ///
    /// No request timeout is set: a stalled server stalls the call.
    ///
    /// # Errors
    ///
    /// Returns `RaError::Transport` if the HTTP client cannot be initialised
    /// (e.g., TLS backend failure).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RaError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &GraphQlRequest<'_>) -> Result<Value, RaError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(REFERER, ORIGIN)
            .json(request)
            .send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            // GraphQL servers often pair a 4xx with a regular error envelope.
            return Err(match unwrap_envelope(&body) {
                Err(err @ RaError::GraphQl(_)) => err,
                _ => RaError::Http {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        unwrap_envelope(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<ErrorDoc>>,
}

#[derive(Debug, Deserialize)]
struct ErrorDoc {
    message: String,
}

/// Extract `data` from a GraphQL response body.
///
/// Any entry in `errors` fails the whole response, even when partial `data`
/// is present.
///
/// # Errors
///
/// - `RaError::MalformedResponse` — body is not a GraphQL envelope, or has no `data`
/// - `RaError::GraphQl` — the server reported errors
pub fn unwrap_envelope(body: &str) -> Result<Value, RaError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(RaError::GraphQl(messages.join("; ")));
    }

    match envelope.data {
        Some(Value::Null) | None => Err(RaError::MalformedResponse(
            "response has no data".to_owned(),
        )),
        Some(data) => Ok(data),
    }
}

/// Client for the events API: a transport plus the run's diagnostics.
pub struct RaClient<T = HttpTransport> {
    transport: T,
    diag: Diagnostics,
}

impl<T: Transport> RaClient<T> {
    #[must_use]
    pub fn new(transport: T, diag: Diagnostics) -> Self {
        Self { transport, diag }
    }

    /// The diagnostics channel this client logs to.
    #[must_use]
    pub fn diag(&self) -> &Diagnostics {
        &self.diag
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one named query and decode its `data` into `R`.
    pub(crate) fn query<R: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: Value,
    ) -> Result<R, RaError> {
        let _t = self.diag.timer(operation);
        self.diag
            .scope(|| debug!(operation, %variables, "sending GraphQL request"));

        let request = GraphQlRequest { query, variables };
        let data = self.transport.execute(&request)?;
        Ok(serde_json::from_value(data)?)
    }
}
