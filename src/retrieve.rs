/// Retrieval collaborator seam.
///
/// The client core never talks HTTP directly: it hands an ordered list of
/// URLs (plus per-URL query parameters) to a `Retriever` and consumes a
/// matching ordered list of responses. Concurrency, retry, and timeout
/// policy all live behind this trait; failures surface as opaque fetch
/// errors and are propagated to callers unmodified.
///
/// `HttpRetriever` is the bundled implementation: a sequential
/// `reqwest::blocking` client with a request timeout.

use std::time::Duration;

use serde_json::Value;

use crate::logging::{self, DataSource};
use crate::model::FetchError;

/// Query parameters for one URL, in the order they should be encoded.
pub type QueryPairs = Vec<(String, String)>;

/// Default request timeout for the bundled retriever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Retriever trait
// ---------------------------------------------------------------------------

/// Fetch capability: one response per request, order preserved.
pub trait Retriever {
    /// Fetches each URL with its query parameters and parses the body as
    /// JSON. `per_url_params` must have one entry per URL.
    fn retrieve_json(
        &self,
        urls: &[String],
        per_url_params: &[QueryPairs],
    ) -> Result<Vec<Value>, FetchError>;

    /// Fetches each URL and returns the raw body text.
    fn retrieve_text(&self, urls: &[String]) -> Result<Vec<String>, FetchError>;
}

// ---------------------------------------------------------------------------
// Blocking HTTP implementation
// ---------------------------------------------------------------------------

/// Sequential blocking retriever over a shared `reqwest` client.
pub struct HttpRetriever {
    client: reqwest::blocking::Client,
}

impl HttpRetriever {
    /// Builds a retriever with the default request timeout.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| -> FetchError { Box::new(e) })?;
        Ok(HttpRetriever { client })
    }

    /// Wraps an existing client, keeping whatever timeout and TLS settings
    /// it was built with.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        HttpRetriever { client }
    }

    fn get(&self, url: &str, params: &QueryPairs) -> Result<reqwest::blocking::Response, FetchError> {
        logging::debug(DataSource::Stn, None, &format!("GET {}", url));
        let mut request = self.client.get(url).header("Accept", "application/json");
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().map_err(|e| -> FetchError { Box::new(e) })?;
        if !response.status().is_success() {
            let err = format!("STN API error: {} for {}", response.status(), url);
            logging::log_fetch_failure(url, "request", &err);
            return Err(err.into());
        }
        Ok(response)
    }
}

fn check_counts(urls: &[String], per_url_params: &[QueryPairs]) -> Result<(), FetchError> {
    if urls.len() != per_url_params.len() {
        return Err(format!(
            "retrieve_json requires one parameter set per URL: got {} URLs and {} parameter sets",
            urls.len(),
            per_url_params.len()
        )
        .into());
    }
    Ok(())
}

impl Retriever for HttpRetriever {
    fn retrieve_json(
        &self,
        urls: &[String],
        per_url_params: &[QueryPairs],
    ) -> Result<Vec<Value>, FetchError> {
        check_counts(urls, per_url_params)?;
        let mut bodies = Vec::with_capacity(urls.len());
        for (url, params) in urls.iter().zip(per_url_params) {
            let response = self.get(url, params)?;
            let body: Value = response.json().map_err(|e| -> FetchError {
                logging::log_fetch_failure(url, "decode", &e.to_string());
                Box::new(e)
            })?;
            bodies.push(body);
        }
        Ok(bodies)
    }

    fn retrieve_text(&self, urls: &[String]) -> Result<Vec<String>, FetchError> {
        let mut bodies = Vec::with_capacity(urls.len());
        for url in urls {
            let response = self.get(url, &QueryPairs::new())?;
            let body = response.text().map_err(|e| -> FetchError {
                logging::log_fetch_failure(url, "read", &e.to_string());
                Box::new(e)
            })?;
            bodies.push(body);
        }
        Ok(bodies)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
