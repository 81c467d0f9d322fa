use std::time::Duration;

use docfetch_logging::docfetch_debug;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::decode::decode_page;
use crate::{FailureKind, FetchError, LoadedPage};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Upper bound for loading a listing page, body included.
    pub navigation_timeout: Duration,
    /// Upper bound for the whole payload download.
    pub download_timeout: Duration,
    pub redirect_limit: usize,
    pub max_page_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            navigation_timeout: Duration::from_secs(90),
            download_timeout: Duration::from_secs(180),
            redirect_limit: 5,
            max_page_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    pub(crate) fn build_client(&self, timeout: Duration) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(self.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

/// Loads a page and hands back its decoded HTML once the page has settled.
///
/// A headless browser can sit behind this seam; the bundled implementation
/// treats a fully received body as the quiescent point.
#[async_trait::async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<LoadedPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPageLoader {
    settings: FetchSettings,
}

impl ReqwestPageLoader {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn load_inner(&self, url: reqwest::Url) -> Result<LoadedPage, FetchError> {
        let requested_url = url.to_string();
        let client = self.settings.build_client(self.settings.navigation_timeout)?;

        let response = client
            .get(url)
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(map_navigation_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{requested_url} answered {status}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_page_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_page_bytes,
                        actual: Some(content_len),
                    },
                    "listing page too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    format!("{final_url} is not an html page"),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_navigation_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_page_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_page_bytes,
                        actual: Some(next_len),
                    },
                    "listing page too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        docfetch_debug!("Loaded {} ({} bytes)", final_url, bytes.len());

        let decoded = decode_page(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        Ok(LoadedPage {
            requested_url,
            final_url,
            html: decoded.html,
            encoding_label: decoded.encoding_label,
        })
    }
}

#[async_trait::async_trait]
impl PageLoader for ReqwestPageLoader {
    async fn load(&self, url: &str) -> Result<LoadedPage, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;

        // The client timeout covers the request; this bounds the body read as well.
        match tokio::time::timeout(self.settings.navigation_timeout, self.load_inner(parsed)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::new(
                FailureKind::NavigationTimeout,
                format!(
                    "{url} did not load within {:?}",
                    self.settings.navigation_timeout
                ),
            )),
        }
    }
}

fn map_navigation_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::NavigationTimeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

pub(crate) fn map_download_error(err: reqwest::Error) -> FetchError {
    FetchError::new(FailureKind::Network, err.to_string())
}
