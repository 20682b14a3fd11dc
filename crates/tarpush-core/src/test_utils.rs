//! Test utilities for archive decoding and upload endpoints.
//!
//! This module provides helpers shared by unit tests, integration tests and
//! the CLI tests: decoding a produced archive back into `(name, content)`
//! pairs, and a one-shot HTTP endpoint that records the request it receives.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc
)]

use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Decodes a gzip-compressed TAR archive into `(name, content)` pairs, in
/// archive order.
///
/// Names use `/` separators.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarpush_core::archive::ArchiveConfig;
/// use tarpush_core::archive::write_archive;
/// use tarpush_core::test_utils::read_archive;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("foo.txt"), "bar").unwrap();
///
/// let mut data = Vec::new();
/// write_archive(dir.path(), &mut [&mut data], &ArchiveConfig::default()).unwrap();
///
/// assert_eq!(read_archive(&data), vec![("foo.txt".to_string(), b"bar".to_vec())]);
/// ```
#[must_use]
pub fn read_archive(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(GzDecoder::new(data));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().replace('\\', "/");
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (name, content)
        })
        .collect()
}

/// A request captured by [`MockEndpoint`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method, e.g. `POST`.
    pub method: String,
    /// Request target, e.g. `/apis/demo/upload`.
    pub path: String,
    /// Header map with lowercased names.
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// One-shot HTTP endpoint listening on `127.0.0.1`.
///
/// Accepts a single connection, reads one request with a
/// `Content-Length` body, answers with the configured status and an empty
/// body, and hands the request back through [`MockEndpoint::request`].
pub struct MockEndpoint {
    base_url: String,
    receiver: mpsc::Receiver<RecordedRequest>,
}

impl MockEndpoint {
    /// Starts an endpoint that answers every request with `status`.
    #[must_use]
    pub fn respond_with(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let request = read_request(&mut reader);

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status} {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                reason_phrase(status)
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = sender.send(request);
        });

        Self { base_url, receiver }
    }

    /// Base URL to use as the upload endpoint, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Waits for the recorded request.
    ///
    /// Returns `None` if nothing arrived within five seconds.
    #[must_use]
    pub fn request(&self) -> Option<RecordedRequest> {
        self.receiver.recv_timeout(Duration::from_secs(5)).ok()
    }
}

/// Endpoint that accepts connections and closes them without answering.
///
/// Every accepted connection is counted, which shows how many times a
/// client tried before giving up.
pub struct DroppingEndpoint {
    base_url: String,
    accepts: Arc<AtomicUsize>,
}

impl DroppingEndpoint {
    /// Starts listening on `127.0.0.1`.
    #[must_use]
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let accepts = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&accepts);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        Self { base_url, accepts }
    }

    /// Base URL to use as the upload endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Connections accepted so far.
    #[must_use]
    pub fn accept_count(&self) -> usize {
        self.accepts.load(Ordering::SeqCst)
    }
}

/// Returns a base URL on which nothing is listening.
#[must_use]
pub fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn read_request<R: BufRead>(reader: &mut R) -> RecordedRequest {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).unwrap();

    RecordedRequest {
        method,
        path,
        headers,
        body,
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
