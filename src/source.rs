//! Image source resolution: classify an input string as a URL or a local
//! path and acquire the decoded image.

use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;

/// Default timeout for the remote fetch (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the image bytes come from.
///
/// Both variants are "acquire bytes" operations behind [`Fetcher::fetch`],
/// so the converter never needs to know which path was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local filesystem.
    LocalFile(PathBuf),
    /// A remote image fetched with a single HTTP GET.
    RemoteUrl(String),
}

impl ImageSource {
    /// Classify an input string.
    ///
    /// Anything starting with `http://` or `https://` is treated as a URL;
    /// everything else is a local path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            ImageSource::RemoteUrl(raw.to_string())
        } else {
            ImageSource::LocalFile(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::LocalFile(path) => write!(f, "{}", path.display()),
            ImageSource::RemoteUrl(url) => write!(f, "{}", url),
        }
    }
}

/// Acquires raw image bytes from either source kind.
///
/// Holds one HTTP client with request and connect timeouts so a dead remote
/// fails instead of hanging. A single failed attempt is terminal for the
/// run; there are no retries.
pub struct Fetcher {
    http: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with the default timeouts.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { http })
    }

    /// Read the full image bytes from the source.
    ///
    /// URL case: one HTTP GET; any non-2xx status is a failure and the body
    /// is treated as opaque bytes regardless of declared content-type.
    /// Local case: one filesystem read.
    pub async fn fetch(&self, source: &ImageSource) -> Result<Vec<u8>, SourceError> {
        match source {
            ImageSource::LocalFile(path) => {
                std::fs::read(path).map_err(|e| SourceError::FileRead {
                    path: path.clone(),
                    source: e,
                })
            }
            ImageSource::RemoteUrl(url) => {
                let response =
                    self.http
                        .get(url)
                        .send()
                        .await
                        .map_err(|e| SourceError::Request {
                            url: url.clone(),
                            source: e,
                        })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::HttpStatus {
                        url: url.clone(),
                        status,
                    });
                }

                let bytes = response.bytes().await.map_err(|e| SourceError::Request {
                    url: url.clone(),
                    source: e,
                })?;

                log::debug!("fetched {} bytes from {}", bytes.len(), url);
                Ok(bytes.to_vec())
            }
        }
    }

    /// Fetch and decode in one step.
    pub async fn load(&self, source: &ImageSource) -> Result<DynamicImage, SourceError> {
        let bytes = self.fetch(source).await?;
        decode(&bytes)
    }
}

/// Decode raw bytes into an image, guessing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, SourceError> {
    image::load_from_memory(bytes).map_err(SourceError::Decode)
}

/// Errors that can occur while resolving an image source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read image file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request to '{url}' failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("'{url}' returned HTTP status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode image data: {0}")]
    Decode(image::ImageError),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}
