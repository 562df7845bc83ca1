//! Remote collection fetcher: one POST per call, partial-failure tolerant.

use crate::collection::Collection;
use crate::graphql::{GraphqlResponse, resolve_error_path};
use crate::icons;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Public tarkov.dev GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.tarkov.dev/graphql";

/// Why a collection could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent, or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body was not a GraphQL JSON envelope.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
    /// The server reported errors and the response is not usable.
    /// Carries the first reported message verbatim.
    #[error("{0}")]
    Graphql(String),
    /// No errors were reported, but the collection field is missing.
    #[error("response has no '{0}' collection")]
    MissingCollection(&'static str),
    /// The collection field is present but is not a list.
    #[error("'{0}' collection is not a list")]
    UnexpectedShape(&'static str),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Sends a JSON request body to an endpoint and returns the response body.
pub trait Transport: Send + Sync {
    fn post_json(&self, endpoint: &str, body: String) -> Result<String, FetchError>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(None)
    }

    /// A transport whose requests give up after `timeout`. `None` waits
    /// indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, endpoint: &str, body: String) -> Result<String, FetchError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .body(body)
            .send()?;

        // Validation errors arrive as a 4xx status with a regular envelope.
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() && !is_graphql_envelope(&text) {
            return Err(FetchError::Transport(format!(
                "POST {} returned HTTP {}",
                endpoint, status
            )));
        }
        Ok(text)
    }
}

fn is_graphql_envelope(body: &str) -> bool {
    serde_json::from_str::<GraphqlResponse>(body)
        .is_ok_and(|response| response.data.is_some() || !response.errors.is_empty())
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

/// Fetches collections from a GraphQL endpoint.
///
/// Holds no state between calls; every fetch issues a fresh request.
#[derive(Debug, Clone)]
pub struct Fetcher<T = HttpTransport> {
    transport: T,
    endpoint: String,
}

impl Fetcher<HttpTransport> {
    /// A fetcher for `endpoint` using a default HTTP client.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::with_transport(HttpTransport::new()?, endpoint))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches one collection in `locale`.
    ///
    /// With `strict` set any reported GraphQL error fails the call; otherwise
    /// errors are logged and partial data is returned as long as the
    /// collection holds at least one record.
    pub fn fetch(
        &self,
        collection: Collection,
        locale: &str,
        strict: bool,
    ) -> Result<Vec<Value>, FetchError> {
        let document = collection.document(locale);
        let body = serde_json::to_string(&QueryBody { query: &document })?;

        tracing::debug!(%collection, locale, endpoint = %self.endpoint, "Requesting collection");
        let response = self.transport.post_json(&self.endpoint, body)?;

        let records = process_response(collection, &response, strict)?;
        tracing::info!(%collection, locale, records = records.len(), "Fetched collection");
        Ok(records)
    }
}

/// Fetches one collection from the public endpoint.
pub fn fetch_collection(
    collection: Collection,
    locale: &str,
    strict: bool,
) -> Result<Vec<Value>, FetchError> {
    Fetcher::new(DEFAULT_ENDPOINT)?.fetch(collection, locale, strict)
}

/// Applies the error-tolerance policy and post-processing to a raw
/// response body.
pub fn process_response(
    collection: Collection,
    body: &str,
    strict: bool,
) -> Result<Vec<Value>, FetchError> {
    let response: GraphqlResponse = serde_json::from_str(body)?;

    if let Some(first) = response.errors.first() {
        report_errors(collection, &response);

        let has_records = matches!(
            response.field(collection.field()),
            Some(Value::Array(records)) if !records.is_empty()
        );
        if strict || !has_records {
            return Err(FetchError::Graphql(first.message.clone()));
        }
    }

    let field = collection.field();
    let taken = response
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take));
    let mut records = match taken {
        Some(Value::Array(records)) => records,
        Some(Value::Null) | None => return Err(FetchError::MissingCollection(field)),
        Some(_) => return Err(FetchError::UnexpectedShape(field)),
    };

    icons::apply_to_records(collection, &mut records);
    Ok(records)
}

fn report_errors(collection: Collection, response: &GraphqlResponse) {
    for error in &response.errors {
        tracing::warn!(%collection, message = %error.message, "Error in API query");

        let Some(data) = response.data.as_ref() else {
            continue;
        };
        match resolve_error_path(data, &error.path) {
            Some(record) => tracing::debug!(%collection, %record, "Offending record"),
            None => tracing::trace!(%collection, path = ?error.path, "Error path did not resolve"),
        }
    }
}
