use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, RequestBuilder, Response, Url};
use tokio::io::AsyncWriteExt;
use tunefetch_logging::tune_debug;

use crate::{FailureKind, FetchError, PageBody};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub search_timeout: Duration,
    pub page_timeout: Duration,
    pub download_timeout: Duration,
    pub redirect_limit: usize,
    pub max_page_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(15),
            page_timeout: Duration::from_secs(15),
            download_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_page_bytes: 5 * 1024 * 1024,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Which per-request budget applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Budget {
    Search,
    Page,
    Download,
}

/// One pooled HTTP client shared by discovery, extraction and downloads.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// GET an HTML page, bounded by `page_timeout` and `max_page_bytes`.
    pub async fn get_page(&self, url: &str) -> Result<PageBody, FetchError> {
        let request = self.client.get(parse_url(url)?);
        let response = self.send(request, Budget::Page).await?;
        self.collect_page(response).await
    }

    /// POST a form-encoded body, bounded by `search_timeout`.
    pub async fn submit_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<PageBody, FetchError> {
        let request = self.client.post(parse_url(url)?).form(form);
        let response = self.send(request, Budget::Search).await?;
        self.collect_page(response).await
    }

    /// Streams `url` into `dest`, creating or truncating it. Returns the byte
    /// count. Nothing is created when the server answers with an error status.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let request = self.client.get(parse_url(url)?);
        let response = self.send(request, Budget::Download).await?;

        let mut file = tokio::fs::File::create(dest).await.map_err(io_failure)?;
        let mut written: u64 = 0;
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport_failure)?;
            file.write_all(&chunk).await.map_err(io_failure)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_failure)?;
        tune_debug!("download {} -> {} ({} bytes)", url, dest.display(), written);
        Ok(written)
    }

    async fn send(&self, request: RequestBuilder, budget: Budget) -> Result<Response, FetchError> {
        let timeout = match budget {
            Budget::Search => self.settings.search_timeout,
            Budget::Page => self.settings.page_timeout,
            Budget::Download => self.settings.download_timeout,
        };
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{} answered {}", response.url(), status),
            ));
        }
        Ok(response)
    }

    async fn collect_page(&self, response: Response) -> Result<PageBody, FetchError> {
        let max_bytes = self.settings.max_page_bytes;
        let too_large = |actual: u64| {
            FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(actual),
                },
                "page exceeds size cap",
            )
        };
        if let Some(declared) = response.content_length().filter(|len| *len > max_bytes) {
            return Err(too_large(declared));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport_failure)?;
            let total = (bytes.len() + chunk.len()) as u64;
            if total > max_bytes {
                return Err(too_large(total));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(PageBody {
            bytes,
            content_type,
            final_url,
        })
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))
}

fn transport_failure(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}

fn io_failure(err: std::io::Error) -> FetchError {
    FetchError::new(FailureKind::Io, err.to_string())
}
