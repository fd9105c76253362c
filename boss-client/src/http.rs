//! HTTP client for the filelist and file servers

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of bytes fetched by [`HttpClient::get_range`].
pub const DEFAULT_PROBE_BYTES: usize = 0x400;

/// Production filelist server base URL.
pub const DEFAULT_FILELIST_BASE: &str = "https://npfl.c.app.nintendowifi.net/p01/filelist";

/// Production file server base URL.
pub const DEFAULT_FILE_BASE: &str = "https://npdl.cdn.nintendowifi.net/p01/nsa";

/// Task folder appended to every URL.
const TASK_FOLDER: &str = "FGONLYT";

/// Query suffix the filelist server expects.
const FILELIST_QUERY: &str = "ap=11012900000";

/// Query suffix the file server expects.
const FILE_QUERY: &str = "ap=11012900000&tm=2";

/// HTTP client for the BOSS servers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    filelist_base: String,
    file_base: String,
}

impl HttpClient {
    /// Create a client with the production base URLs and the console-shaped
    /// user agent (`CTR NUP 040600 <date>`).
    pub fn new() -> Result<Self> {
        let user_agent = format!(
            "CTR NUP 040600 {}",
            chrono::Local::now().format("%B %d %Y %H:%M:%S")
        );
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            filelist_base: DEFAULT_FILELIST_BASE.to_string(),
            file_base: DEFAULT_FILE_BASE.to_string(),
        })
    }

    /// Create a client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            filelist_base: DEFAULT_FILELIST_BASE.to_string(),
            file_base: DEFAULT_FILE_BASE.to_string(),
        }
    }

    /// Override the filelist server base URL (tests, mirrors).
    #[must_use]
    pub fn with_filelist_base(mut self, base: impl Into<String>) -> Self {
        self.filelist_base = base.into();
        self
    }

    /// Override the file server base URL (tests, mirrors).
    #[must_use]
    pub fn with_file_base(mut self, base: impl Into<String>) -> Self {
        self.file_base = base.into();
        self
    }

    /// URL of the filelist for one source.
    #[must_use]
    pub fn filelist_url(&self, source_id: &str) -> String {
        format!(
            "{}/{source_id}/{TASK_FOLDER}?{FILELIST_QUERY}",
            self.filelist_base
        )
    }

    /// URL of one archive on the file server.
    #[must_use]
    pub fn file_url(&self, source_id: &str, entry_name: &str) -> String {
        format!(
            "{}/{source_id}/{TASK_FOLDER}/{entry_name}?{FILE_QUERY}",
            self.file_base
        )
    }

    /// Download a URL in full.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        trace!("Received {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }

    /// Download a URL and decode it as UTF-8 text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let body = self.get(url).await?;
        String::from_utf8(body).map_err(|_| Error::NotText {
            url: url.to_string(),
        })
    }

    /// Fetch at most `max_bytes` from the start of a URL via a Range
    /// request. Lightweight probing only; full downloads go through
    /// [`get`](Self::get).
    ///
    /// Servers that ignore the Range header may return more; the result is
    /// truncated to `max_bytes` either way.
    pub async fn get_range(&self, url: &str, max_bytes: usize) -> Result<Vec<u8>> {
        debug!("GET {url} (range 0-{})", max_bytes.saturating_sub(1));
        let response = self
            .client
            .get(url)
            .header("Range", format!("bytes=0-{}", max_bytes.saturating_sub(1)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut body = response.bytes().await?.to_vec();
        body.truncate(max_bytes);
        Ok(body)
    }
}
