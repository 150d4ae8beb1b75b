use scraper::{ElementRef, Html, Selector};
use tunefetch_logging::{tune_debug, tune_warn};
use url::Url;

use crate::{decode_page, ReqwestFetcher, TrackInfo, UNKNOWN_TITLE};

/// Fetches a track page and recovers its title and direct audio URL.
#[derive(Debug, Clone)]
pub struct TrackExtractor {
    fetcher: ReqwestFetcher,
}

impl TrackExtractor {
    pub fn new(fetcher: ReqwestFetcher) -> Self {
        Self { fetcher }
    }

    /// `None` when the page could not be fetched.
    pub async fn extract(&self, page_url: &str) -> Option<TrackInfo> {
        let output = match self.fetcher.get_page(page_url).await {
            Ok(output) => output,
            Err(err) => {
                tune_warn!("page fetch {} failed: {}", page_url, err);
                return None;
            }
        };

        let host = Url::parse(&output.final_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));
        let page = decode_page(
            &output.bytes,
            output.content_type.as_deref(),
            host.as_deref(),
        );
        let info = parse_track_page(&page.html, page_url);
        tune_debug!(
            "extracted {} title={:?} audio={:?} encoding={}",
            page_url,
            info.title,
            info.audio_url,
            page.encoding_label
        );
        Some(info)
    }
}

/// Applies the title and audio heuristics to an already fetched page.
///
/// Title: first `<h1>` text, then `og:title`, then [`UNKNOWN_TITLE`].
/// Audio, first hit wins:
/// 1. anchor whose href ends in `.mp3` or contains `.mp3?`
/// 2. anchor on a `/get/` or `/download` path whose href mentions `.mp3`
/// 3. `<audio src>` containing `.mp3`, else its nested `<source src>`
/// 4. `og:audio`
///
/// Root-relative audio URLs are prefixed with the origin of `page_url`,
/// protocol-relative ones with its scheme.
/// Script-only audio URLs are not recovered.
pub fn parse_track_page(html: &str, page_url: &str) -> TrackInfo {
    let doc = Html::parse_document(html);

    let title = heading_title(&doc)
        .or_else(|| meta_content(&doc, "og:title"))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let audio_url = find_audio_url(&doc).map(|url| absolutize(&url, page_url));

    TrackInfo { title, audio_url }
}

fn heading_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("h1").ok()?;
    let heading = doc.select(&sel).next()?;
    let text = heading.text().collect::<String>();
    Some(text.trim().to_string()).filter(|t| !t.is_empty())
}

fn meta_content(doc: &Html, property: &str) -> Option<String> {
    let sel = Selector::parse(&format!(
        r#"meta[property="{property}"], meta[name="{property}"]"#
    ))
    .ok()?;
    doc.select(&sel)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

fn find_audio_url(doc: &Html) -> Option<String> {
    let anchors: Vec<String> = Selector::parse("a[href]")
        .ok()
        .map(|sel| {
            doc.select(&sel)
                .filter_map(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    anchors
        .iter()
        .find(|href| is_direct_mp3(href))
        .or_else(|| anchors.iter().find(|href| is_download_link(href)))
        .cloned()
        .or_else(|| audio_element_src(doc))
        .or_else(|| meta_content(doc, "og:audio"))
}

fn is_direct_mp3(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.ends_with(".mp3") || lower.contains(".mp3?")
}

fn is_download_link(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    (lower.contains("/get/") || lower.contains("/download")) && lower.contains(".mp3")
}

fn audio_element_src(doc: &Html) -> Option<String> {
    let audio_sel = Selector::parse("audio").ok()?;
    let source_sel = Selector::parse("source[src]").ok()?;
    doc.select(&audio_sel)
        .find_map(|audio| own_mp3_src(audio).or_else(|| nested_source(audio, &source_sel)))
}

fn own_mp3_src(audio: ElementRef) -> Option<String> {
    audio
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| src.to_ascii_lowercase().contains(".mp3"))
        .map(str::to_string)
}

fn nested_source(audio: ElementRef, source_sel: &Selector) -> Option<String> {
    audio
        .select(source_sel)
        .filter_map(|source| source.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
}

/// `/path` gets the page origin; `//host/path` only borrows the page scheme.
fn absolutize(audio_url: &str, page_url: &str) -> String {
    if !audio_url.starts_with('/') {
        return audio_url.to_string();
    }
    let Ok(page) = Url::parse(page_url) else {
        return audio_url.to_string();
    };
    if audio_url.starts_with("//") {
        format!("{}:{}", page.scheme(), audio_url)
    } else {
        format!("{}{}", page.origin().ascii_serialization(), audio_url)
    }
}
