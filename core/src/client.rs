//! Blocking client for the checks API.
//!
//! # Design
//! `ChecklyClient` holds immutable configuration plus shared handles to a
//! transport and an optional trace sink, so it is cheap to clone and safe to
//! share across threads. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`; the `*_check` methods glue the two together through the
//! transport. Serialization happens in `build_*`, so an unencodable payload
//! fails before any network I/O.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::trace::{self, TraceSink};
use crate::types::Check;

const API_PREFIX: &str = "/v1/";
const CHECKS_PATH: &str = "checks";

/// Synchronous client for the checks API.
#[derive(Clone)]
pub struct ChecklyClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    trace: Option<TraceSink>,
}

impl ChecklyClient {
    /// Client using a default `UreqTransport` and no tracing.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(UreqTransport::new()),
            trace: None,
        }
    }

    /// Replace the transport, e.g. with one that has a timeout or with a
    /// test double.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Dump every request and response to `sink`.
    pub fn with_trace(mut self, sink: TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a check and return the ID the server assigned to it.
    pub fn create_check(&self, check: &Check) -> Result<String, ApiError> {
        let request = self.build_create_check(check)?;
        self.parse_create_check(self.execute(request)?)
    }

    pub fn get_check(&self, id: &str) -> Result<Check, ApiError> {
        let request = self.build_get_check(id);
        self.parse_get_check(self.execute(request)?)
    }

    /// Replace the check `id` with `check` in full.
    pub fn update_check(&self, id: &str, check: &Check) -> Result<(), ApiError> {
        let request = self.build_update_check(id, check)?;
        self.parse_update_check(self.execute(request)?)
    }

    pub fn delete_check(&self, id: &str) -> Result<(), ApiError> {
        let request = self.build_delete_check(id);
        self.parse_delete_check(self.execute(request)?)
    }

    pub fn build_create_check(&self, check: &Check) -> Result<HttpRequest, ApiError> {
        self.build_json_request(HttpMethod::Post, CHECKS_PATH, check)
    }

    pub fn build_get_check(&self, id: &str) -> HttpRequest {
        self.build_request(HttpMethod::Get, &check_path(id), None)
    }

    pub fn build_update_check(&self, id: &str, check: &Check) -> Result<HttpRequest, ApiError> {
        self.build_json_request(HttpMethod::Put, &check_path(id), check)
    }

    pub fn build_delete_check(&self, id: &str) -> HttpRequest {
        self.build_request(HttpMethod::Delete, &check_path(id), None)
    }

    pub fn parse_create_check(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 201)?;
        let check: Check = decode(response.body)?;
        Ok(check.id)
    }

    pub fn parse_get_check(&self, response: HttpResponse) -> Result<Check, ApiError> {
        check_status(&response, 200)?;
        decode(response.body)
    }

    pub fn parse_update_check(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)?;
        let _: Check = decode(response.body)?;
        Ok(())
    }

    pub fn parse_delete_check(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    /// Call the API at `path` (relative to `/v1/`) and return the raw
    /// response, whatever its status.
    pub fn make_api_call(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<HttpResponse, TransportError> {
        self.execute(self.build_request(method, path, payload))
    }

    fn build_json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(payload).map_err(ApiError::SerializationError)?;
        Ok(self.build_request(method, path, Some(body)))
    }

    fn build_request(&self, method: HttpMethod, path: &str, body: Option<Vec<u8>>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{API_PREFIX}{path}", self.config.base_url()),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key()),
                ),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(sink) = &self.trace {
            trace::dump_request(sink, &request);
        }
        let response = self.transport.execute(&request).inspect_err(|e| {
            tracing::debug!(method = %request.method, url = %request.url, error = %e, "API call failed");
        })?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "API call"
        );
        if let Some(sink) = &self.trace {
            trace::dump_response(sink, &response);
        }
        Ok(response)
    }
}

impl fmt::Debug for ChecklyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecklyClient")
            .field("config", &self.config)
            .field("trace", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}

fn check_path(id: &str) -> String {
    format!("{CHECKS_PATH}/{id}")
}

/// Any status other than `expected` is an error carrying the raw body.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, ApiError> {
    serde_json::from_str(&body).map_err(|source| ApiError::DeserializationError { body, source })
}
