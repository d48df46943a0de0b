//! Request/response dumps for debugging.
//!
//! A `TraceSink` receives a textual dump of every outgoing request and every
//! response received. Dumping is best effort: a failed write or a poisoned
//! lock is logged and otherwise ignored, so tracing can never change the
//! outcome of an API call.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::http::{HttpRequest, HttpResponse};

/// Shared writer receiving request/response dumps.
///
/// The request dump is taken before the transport runs, so it holds the
/// method, URL, headers and body the client built. Headers the transport adds
/// on the wire (`Host`, `User-Agent`, `Content-Length`) are not part of it.
/// The response dump holds every header the transport returned.
pub type TraceSink = Arc<Mutex<dyn Write + Send>>;

pub(crate) fn dump_request(sink: &TraceSink, request: &HttpRequest) {
    let mut dump = format!("{} {}\n", request.method, request.url);
    for (name, value) in &request.headers {
        dump.push_str(&format!("{name}: {value}\n"));
    }
    dump.push('\n');
    if let Some(body) = &request.body {
        dump.push_str(&String::from_utf8_lossy(body));
    }
    write_dump(sink, &dump);
}

pub(crate) fn dump_response(sink: &TraceSink, response: &HttpResponse) {
    let mut dump = format!("HTTP {}\n", response.status);
    for (name, value) in &response.headers {
        dump.push_str(&format!("{name}: {value}\n"));
    }
    dump.push('\n');
    dump.push_str(&response.body);
    write_dump(sink, &dump);
}

fn write_dump(sink: &TraceSink, dump: &str) {
    let mut writer = match sink.lock() {
        Ok(writer) => writer,
        Err(_) => {
            tracing::warn!("trace sink lock poisoned, dropping dump");
            return;
        }
    };
    if let Err(e) = writeln!(writer, "{dump}\n").and_then(|()| writer.flush()) {
        tracing::warn!(error = %e, "failed to write trace dump");
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::http::HttpMethod;

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn request_dump_has_request_line_headers_and_body() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink: TraceSink = buffer.clone();
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost/v1/checks".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(br#"{"name":"test"}"#.to_vec()),
        };

        dump_request(&sink, &request);

        let dump = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(dump.starts_with("POST http://localhost/v1/checks\n"));
        assert!(dump.contains("content-type: application/json\n"));
        assert!(dump.contains(r#"{"name":"test"}"#));
    }

    #[test]
    fn response_dump_has_status_and_body() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink: TraceSink = buffer.clone();
        let response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };

        dump_response(&sink, &response);

        let dump = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(dump.starts_with("HTTP 204\n"));
    }

    #[test]
    fn response_dump_includes_transport_headers() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink: TraceSink = buffer.clone();
        let response = HttpResponse {
            status: 201,
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("content-length".to_string(), "2".to_string()),
            ],
            body: "{}".to_string(),
        };

        dump_response(&sink, &response);

        let dump = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(dump.contains("content-type: application/json\n"));
        assert!(dump.contains("content-length: 2\n"));
        assert!(dump.contains("\n\n{}"));
    }

    #[test]
    fn write_failures_are_swallowed() {
        let sink: TraceSink = Arc::new(Mutex::new(BrokenWriter));
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "{}".to_string(),
        };
        dump_response(&sink, &response);
    }
}
