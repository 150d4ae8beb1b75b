//! Tunefetch engine: search, scraping and download pipeline.
mod decode;
mod discover;
mod download;
mod engine;
mod extract;
mod fetch;
mod filename;
mod scratch;
mod types;

pub use decode::{decode_page, DecodedPage};
pub use discover::{LinkDiscovery, SiteProfile, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SITE_DOMAIN};
pub use download::FileFetcher;
pub use engine::{EngineConfig, ScrapeEngine, TrackSource, DEFAULT_MAX_RESULTS};
pub use extract::{parse_track_page, TrackExtractor};
pub use fetch::{FetchSettings, ReqwestFetcher};
pub use filename::{audio_file_name, sanitize_title};
pub use scratch::{ensure_scratch_dir, ScratchError, ScratchFile};
pub use types::{
    Candidate, FailureKind, FetchError, PageBody, SetupError, TrackInfo, UNKNOWN_TITLE,
};
