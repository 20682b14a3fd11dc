//! One-shot HTTP upload of a finished archive.
//!
//! A blocking `reqwest` client sends the archive file as the body of a
//! single POST. There is no retry: the first transport error or non-200
//! status is returned as is.

use crate::PushError;
use crate::Result;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::fs::File;
use std::path::Path;
use tracing::debug;
use tracing::info;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Environment variable overriding the endpoint base URL.
pub const ENDPOINT_ENV: &str = "TARPUSH_ENDPOINT";

/// Content type sent with every upload.
pub const ARCHIVE_CONTENT_TYPE: &str = "binary/octet-stream";

/// Where archives are uploaded.
///
/// # Examples
///
/// ```
/// use tarpush_core::upload::UploadConfig;
///
/// let config = UploadConfig::default();
/// assert_eq!(
///     config.upload_url("billing"),
///     "http://localhost:8080/apis/billing/upload"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Base URL without a trailing slash.
    ///
    /// Default: `http://localhost:8080`.
    pub endpoint: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl UploadConfig {
    /// Builds a config from `TARPUSH_ENDPOINT`, falling back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self::default().with_endpoint(endpoint),
            _ => Self::default(),
        }
    }

    /// Sets the endpoint base URL; trailing slashes are dropped.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Returns the upload URL for an identifier.
    ///
    /// The identifier is inserted verbatim, without validation or escaping.
    #[must_use]
    pub fn upload_url(&self, identifier: &str) -> String {
        format!("{}/apis/{identifier}/upload", self.endpoint)
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// URL the archive was posted to.
    pub url: String,
    /// Size of the request body.
    pub bytes_sent: u64,
    /// Response status code (always 200).
    pub status: u16,
}

/// Blocking HTTP client that posts archives to the configured endpoint.
#[derive(Clone)]
pub struct Uploader {
    client: Client,
    config: UploadConfig,
}

impl Uploader {
    /// Creates an uploader for `config`.
    ///
    /// The client has no overall request timeout, so large archives are
    /// bounded only by the transport.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be initialised.
    pub fn new(config: UploadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|source| PushError::Transport {
                url: config.endpoint.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    /// Returns the configuration this uploader posts to.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Posts the file at `path` to `{endpoint}/apis/{identifier}/upload`.
    ///
    /// The body is the raw file content with a known length, sent with
    /// `Content-Type: binary/octet-stream`. The response body is ignored and
    /// the file is closed before returning.
    ///
    /// # Errors
    ///
    /// - `OpenArchive` if the file cannot be opened
    /// - `Transport` on connection-level failure
    /// - `UnexpectedStatus` for any status other than 200
    pub fn upload(&self, identifier: &str, path: &Path) -> Result<UploadReport> {
        let url = self.config.upload_url(identifier);
        let open_error = |source| PushError::OpenArchive {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let bytes_sent = file.metadata().map_err(open_error)?.len();

        debug!(%url, bytes = bytes_sent, "sending archive");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, ARCHIVE_CONTENT_TYPE)
            .body(file)
            .send()
            .map_err(|source| PushError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PushError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        info!(%url, bytes = bytes_sent, "archive uploaded");

        Ok(UploadReport {
            url,
            bytes_sent,
            status: status.as_u16(),
        })
    }
}

/// Uploads the archive at `path` with a one-off [`Uploader`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tarpush_core::upload::UploadConfig;
/// use tarpush_core::upload::upload_file;
///
/// let report = upload_file("billing", Path::new("/tmp/tar-1234"), &UploadConfig::default())?;
/// assert_eq!(report.status, 200);
/// # Ok::<(), tarpush_core::PushError>(())
/// ```
///
/// # Errors
///
/// See [`Uploader::upload`].
pub fn upload_file(identifier: &str, path: &Path, config: &UploadConfig) -> Result<UploadReport> {
    Uploader::new(config.clone())?.upload(identifier, path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::DroppingEndpoint;
    use crate::test_utils::MockEndpoint;
    use crate::test_utils::unreachable_endpoint;
    use std::fs;
    use tempfile::TempDir;

    fn archive_fixture(content: &[u8]) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tar-fixture");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_upload_url_template() {
        let config = UploadConfig::default().with_endpoint("http://127.0.0.1:9000/");
        assert_eq!(
            config.upload_url("api-42"),
            "http://127.0.0.1:9000/apis/api-42/upload"
        );
    }

    #[test]
    fn test_upload_url_identifier_is_not_validated() {
        let config = UploadConfig::default();
        assert_eq!(
            config.upload_url(""),
            "http://localhost:8080/apis//upload"
        );
    }

    #[test]
    fn test_upload_sends_file_as_body() {
        let endpoint = MockEndpoint::respond_with(200);
        let (_temp, path) = archive_fixture(b"\x1f\x8bcompressed");
        let config = UploadConfig::default().with_endpoint(endpoint.url());

        let report = upload_file("demo", &path, &config).unwrap();
        assert_eq!(report.status, 200);
        assert_eq!(report.bytes_sent, 12);
        assert_eq!(report.url, format!("{}/apis/demo/upload", endpoint.url()));

        let request = endpoint.request().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/apis/demo/upload");
        assert_eq!(request.header("content-type"), Some("binary/octet-stream"));
        assert_eq!(request.header("content-length"), Some("12"));
        assert!(request.header("transfer-encoding").is_none());
        assert_eq!(request.body, b"\x1f\x8bcompressed");
    }

    #[test]
    fn test_upload_non_ok_status_is_reported() {
        for status in [201, 404, 500] {
            let endpoint = MockEndpoint::respond_with(status);
            let (_temp, path) = archive_fixture(b"data");
            let config = UploadConfig::default().with_endpoint(endpoint.url());

            let err = upload_file("demo", &path, &config).unwrap_err();
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(
                err.to_string(),
                format!("upload resulted in status code {status}")
            );
        }
    }

    #[test]
    fn test_upload_transport_error_is_distinct() {
        let (_temp, path) = archive_fixture(b"data");
        let config = UploadConfig::default().with_endpoint(unreachable_endpoint());

        let err = upload_file("demo", &path, &config).unwrap_err();
        assert!(err.is_transport());
        assert!(err.status_code().is_none());
        assert!(err.to_string().contains("/apis/demo/upload"));
    }

    #[test]
    fn test_upload_dropped_connection_is_not_retried() {
        let endpoint = DroppingEndpoint::start();
        let (_temp, path) = archive_fixture(b"data");
        let config = UploadConfig::default().with_endpoint(endpoint.url());

        let err = upload_file("demo", &path, &config).unwrap_err();

        assert!(err.is_transport());
        assert_eq!(endpoint.accept_count(), 1);
    }

    #[test]
    fn test_upload_missing_archive() {
        let config = UploadConfig::default().with_endpoint(unreachable_endpoint());
        let err = upload_file("demo", Path::new("/nonexistent/tar-123"), &config).unwrap_err();
        assert!(matches!(err, PushError::OpenArchive { .. }));
    }

    #[test]
    fn test_uploader_reuses_config() {
        let config = UploadConfig::default().with_endpoint("http://example.invalid");
        let uploader = Uploader::new(config.clone()).unwrap();
        assert_eq!(uploader.config(), &config);
    }
}
