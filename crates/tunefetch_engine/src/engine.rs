use std::path::Path;

use tunefetch_logging::tune_debug;

use crate::discover::{DEFAULT_SEARCH_ENDPOINT, DEFAULT_SITE_DOMAIN};
use crate::{
    Candidate, FetchSettings, FileFetcher, LinkDiscovery, ReqwestFetcher, SetupError, SiteProfile,
    TrackExtractor, TrackInfo,
};

pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Everything the conversation layer needs from the network.
#[async_trait::async_trait]
pub trait TrackSource: Send + Sync {
    /// Discovery followed by extraction of each candidate, one at a time.
    async fn search(&self, query: &str) -> Vec<Candidate>;

    /// Single extraction; `None` when the page could not be fetched.
    async fn extract(&self, page_url: &str) -> Option<TrackInfo>;

    /// `true` when the audio file landed at `dest`.
    async fn download(&self, audio_url: &str, dest: &Path) -> bool;
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub search_endpoint: String,
    pub site_domain: String,
    pub max_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            site_domain: DEFAULT_SITE_DOMAIN.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// The production [`TrackSource`]: search engine + site scraping over reqwest.
#[derive(Debug, Clone)]
pub struct ScrapeEngine {
    discovery: LinkDiscovery,
    extractor: TrackExtractor,
    files: FileFetcher,
    max_results: usize,
}

impl ScrapeEngine {
    pub fn new(config: EngineConfig) -> Result<Self, SetupError> {
        let site = SiteProfile::new(&config.site_domain)?;
        let fetcher = ReqwestFetcher::new(config.fetch).map_err(SetupError::Client)?;
        Ok(Self {
            discovery: LinkDiscovery::new(fetcher.clone(), config.search_endpoint, site),
            extractor: TrackExtractor::new(fetcher.clone()),
            files: FileFetcher::new(fetcher),
            max_results: config.max_results,
        })
    }
}

#[async_trait::async_trait]
impl TrackSource for ScrapeEngine {
    async fn search(&self, query: &str) -> Vec<Candidate> {
        let links = self.discovery.discover(query, self.max_results).await;
        let mut candidates = Vec::with_capacity(links.len());
        // Sequential: keeps request bursts against the site and search engine low.
        for link in links {
            let info = self.extractor.extract(&link).await;
            let candidate = Candidate::from_extraction(link, info);
            tune_debug!(
                "candidate {:?} audio={}",
                candidate.title,
                candidate.audio_url.is_some()
            );
            candidates.push(candidate);
        }
        candidates
    }

    async fn extract(&self, page_url: &str) -> Option<TrackInfo> {
        self.extractor.extract(page_url).await
    }

    async fn download(&self, audio_url: &str, dest: &Path) -> bool {
        self.files.download(audio_url, dest).await
    }
}
