use std::{fmt, io::Read, time::Duration};

use async_trait::async_trait;
use flate2::read::GzDecoder;
#[cfg(test)]
use mockall::automock;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::logger::Logging;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const BROWSER_HEADERS: [(header::HeaderName, &str); 5] = [
    (
        header::USER_AGENT,
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    (
        header::ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    (header::ACCEPT_LANGUAGE, "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7"),
    (header::CONNECTION, "keep-alive"),
    (header::CACHE_CONTROL, "max-age=0"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    InvalidUrl,
    Network,
    Timeout,
    Status,
    Decode,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FetchErrorKind::InvalidUrl => "invalid url",
            FetchErrorKind::Network => "network",
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Status => "status",
            FetchErrorKind::Decode => "decode",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        FetchError {
            kind,
            message: message.into(),
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(error: url::ParseError) -> Self {
        FetchError::new(FetchErrorKind::InvalidUrl, error.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FetchErrorKind::Timeout
        } else {
            FetchErrorKind::Network
        };
        FetchError::new(kind, error.to_string())
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetching: Send + Sync {
    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct Crawler<L: Logging> {
    client: reqwest::Client,
    logger: L,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}

impl<L: Logging> Crawler<L> {
    pub fn new(logger: L) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Crawler { client, logger })
    }
}

fn decode_body(encoding: &str, body_bytes: &[u8]) -> Result<Vec<u8>, FetchError> {
    if encoding != "gzip" {
        return Ok(Vec::from(body_bytes));
    }
    let mut reader = GzDecoder::new(body_bytes);
    let mut buf: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| FetchError::new(FetchErrorKind::Decode, e.to_string()))?;
    Ok(buf)
}

#[async_trait]
impl<L: Logging> Fetching for Crawler<L> {
    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchErrorKind::Status,
                format!("non success status for '{url}': {status}"),
            ));
        }
        self.logger.verbose(&format!("status for '{url}': {status}"));
        let encoding = match response.headers().get(header::CONTENT_ENCODING) {
            Some(header_value) => header_value
                .to_str()
                .map_err(|e| FetchError::new(FetchErrorKind::Decode, e.to_string()))?
                .to_owned(),
            None => String::from(""),
        };
        self.logger
            .verbose(&format!("encoding is '{encoding}' for '{url}'"));

        let body_bytes = response.bytes().await?;
        decode_body(&encoding, &body_bytes)
    }
}
