//! HTTP request/response values and the transport that carries them.
//!
//! # Design
//! Requests and responses are plain data. `ChecklyClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the `HttpResponse`
//! that comes back, so the mapping between operations and HTTP stays
//! deterministic and testable without a network. `UreqTransport` is the
//! default blocking implementation; tests and callers with special needs
//! (proxies, custom TLS, recording doubles) supply their own.

use std::fmt;
use std::time::Duration;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. Built by `ChecklyClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Performs one blocking HTTP round-trip.
///
/// Implementations must send `request.body` whatever the method, read the
/// whole response body, and return non-2xx responses as `Ok`; interpreting
/// the status is the client's job.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a blocking `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Fails any call that takes longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    /// Wrap a caller-configured agent. The agent must be built with
    /// `http_status_as_error(false)`, otherwise 4xx/5xx responses surface as
    /// transport errors instead of status errors.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let uri: ureq::http::Uri = request
            .url
            .parse()
            .map_err(|e: ureq::http::uri::InvalidUri| TransportError::InvalidRequest(e.to_string()))?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(TransportError::InvalidRequest(format!(
                "URL is not absolute: {}",
                request.url
            )));
        }

        let result = match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(uri), request),
            HttpMethod::Delete => send_without_body(self.agent.delete(uri), request),
            HttpMethod::Post => send_with_body(self.agent.post(uri), request),
            HttpMethod::Put => send_with_body(self.agent.put(uri), request),
        };
        let mut response = result.map_err(|e| TransportError::Send(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| TransportError::ReadBody {
                status,
                message: e.to_string(),
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

type SendResult = Result<ureq::http::Response<ureq::Body>, ureq::Error>;

/// GET and DELETE carry a payload only when one is given.
fn send_without_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithoutBody>,
    request: &HttpRequest,
) -> SendResult {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.force_send_body().send(body.as_slice()),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    request: &HttpRequest,
) -> SendResult {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.send(body.as_slice()),
        None => builder.send_empty(),
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;

    /// Accept one connection, answer with `status` and `body`, and hand back
    /// the raw request bytes that were received.
    fn serve_once(status: u16, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1/checks", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                } else if n == 0 {
                    break;
                }
            }
            let head = format!(
                "HTTP/1.1 {status} OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
            String::from_utf8_lossy(&received).to_string()
        });
        (url, handle)
    }

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn malformed_url_is_an_invalid_request() {
        let err = UreqTransport::new().execute(&request("http://exa mple.com/v1/checks")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)), "{err:?}");
    }

    #[test]
    fn relative_url_is_an_invalid_request() {
        let err = UreqTransport::new().execute(&request("/v1/checks")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)), "{err:?}");
    }

    #[test]
    fn refused_connection_is_a_send_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = UreqTransport::new()
            .execute(&request(&format!("http://{addr}/v1/checks")))
            .unwrap_err();
        assert!(matches!(err, TransportError::Send(_)), "{err:?}");
    }

    #[test]
    fn payload_is_sent_with_get_and_delete() {
        for method in [HttpMethod::Get, HttpMethod::Delete] {
            let (url, server) = serve_once(200, b"{}".to_vec());
            let req = HttpRequest {
                method,
                url,
                headers: vec![("content-type".to_string(), "application/json".to_string())],
                body: Some(br#"{"reason":"cleanup"}"#.to_vec()),
            };

            let response = UreqTransport::new().execute(&req).unwrap();
            assert_eq!(response.status, 200);

            let received = server.join().unwrap();
            assert!(received.starts_with(method.as_str()), "{received}");
            assert!(received.ends_with(r#"{"reason":"cleanup"}"#), "{method}: {received}");
        }
    }

    #[test]
    fn large_bodies_are_read_in_full() {
        let size = 12 * 1024 * 1024;
        let (url, server) = serve_once(200, vec![b'a'; size]);

        let response = UreqTransport::new().execute(&request(&url)).unwrap();
        assert_eq!(response.body.len(), size);
        server.join().unwrap();
    }
}
