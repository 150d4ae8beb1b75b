use std::fmt;

/// Title used when neither heading nor `og:title` yields anything.
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// What a track page yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: String,
    pub audio_url: Option<String>,
}

/// A discovered page together with whatever extraction recovered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub page_url: String,
    pub audio_url: Option<String>,
}

impl Candidate {
    /// Builds a candidate from an extraction result; a failed fetch falls back
    /// to the page URL as title.
    pub fn from_extraction(page_url: String, info: Option<TrackInfo>) -> Self {
        match info {
            Some(info) => Self {
                title: info.title,
                page_url,
                audio_url: info.audio_url,
            },
            None => Self {
                title: page_url.clone(),
                page_url,
                audio_url: None,
            },
        }
    }
}

/// Raw page bytes plus what decoding needs to know about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// URL after redirects; its host feeds the charset guess.
    pub final_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "filesystem error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("site domain must not be empty")]
    EmptyDomain,
    #[error("http client setup failed: {0}")]
    Client(#[source] FetchError),
    #[error("invalid URL pattern for site {domain:?}: {source}")]
    Pattern {
        domain: String,
        #[source]
        source: regex::Error,
    },
}
