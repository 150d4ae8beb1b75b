use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};
use tunefetch_logging::{tune_debug, tune_info, tune_warn};

use crate::{decode_page, ReqwestFetcher, SetupError};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_SITE_DOMAIN: &str = "rus.hitmotop.com";

/// Where the target site keeps its track pages and how their URLs look.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    domain: String,
    segment: String,
    canonical: Regex,
    redirect: Regex,
}

impl SiteProfile {
    pub fn new(domain: &str) -> Result<Self, SetupError> {
        let domain = domain.trim().trim_end_matches('/');
        if domain.is_empty() {
            return Err(SetupError::EmptyDomain);
        }
        let canonical = format!(r"https?://(?:[\w-]+\.)?{}/song/[\w-]+", regex::escape(domain));
        let canonical = Regex::new(&canonical).map_err(|source| SetupError::Pattern {
            domain: domain.to_string(),
            source,
        })?;
        let redirect = Regex::new(r"[?&]uddg=([^&]+)").map_err(|source| SetupError::Pattern {
            domain: domain.to_string(),
            source,
        })?;
        Ok(Self {
            domain: domain.to_string(),
            segment: format!("{domain}/song/"),
            canonical,
            redirect,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Search-engine query restricted to the site's song pages.
    pub fn scoped_query(&self, query: &str) -> String {
        format!("site:{}/song {}", self.domain, query.trim())
    }

    /// Scans anchors in document order and returns up to `max_results`
    /// distinct song-page URLs.
    pub fn collect_song_links(&self, html: &str, max_results: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        let Some(anchors) = Selector::parse("a[href]").ok() else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in document.select(&anchors) {
            if links.len() >= max_results {
                break;
            }
            let Some(href) = anchor.value().attr("href").map(str::trim) else {
                continue;
            };
            if !href.contains(&self.segment) && !percent_decode(href).contains(&self.segment) {
                continue;
            }
            let url = self.normalize_href(href);
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
        links
    }

    fn normalize_href(&self, href: &str) -> String {
        if let Some(target) = self.redirect.captures(href).and_then(|caps| caps.get(1)) {
            return percent_decode(target.as_str()).into_owned();
        }
        match self.canonical.find(href) {
            Some(found) => found.as_str().to_string(),
            None => href.to_string(),
        }
    }
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Finds candidate track pages through a search engine's HTML interface.
#[derive(Debug, Clone)]
pub struct LinkDiscovery {
    fetcher: ReqwestFetcher,
    endpoint: String,
    site: SiteProfile,
}

impl LinkDiscovery {
    pub fn new(fetcher: ReqwestFetcher, endpoint: impl Into<String>, site: SiteProfile) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            site,
        }
    }

    /// Empty on any transport failure; the error only reaches the log.
    pub async fn discover(&self, query: &str, max_results: usize) -> Vec<String> {
        let scoped = self.site.scoped_query(query);
        tune_debug!("search endpoint={} q={:?}", self.endpoint, scoped);

        let output = match self
            .fetcher
            .submit_form(&self.endpoint, &[("q", scoped.as_str())])
            .await
        {
            Ok(output) => output,
            Err(err) => {
                tune_warn!("search for {:?} failed: {}", query, err);
                return Vec::new();
            }
        };

        let page = decode_page(&output.bytes, output.content_type.as_deref(), None);
        let links = self.site.collect_song_links(&page.html, max_results);
        tune_info!("search for {:?} found {} candidate(s)", query, links.len());
        links
    }
}
