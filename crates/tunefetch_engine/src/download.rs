use std::path::Path;

use tunefetch_logging::{tune_info, tune_warn};

use crate::ReqwestFetcher;

/// Streams audio files to local storage.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    fetcher: ReqwestFetcher,
}

impl FileFetcher {
    pub fn new(fetcher: ReqwestFetcher) -> Self {
        Self { fetcher }
    }

    /// `true` once the whole body is on disk at `dest`. Failures are logged,
    /// never returned; a partial file may remain for the caller to clean up.
    pub async fn download(&self, url: &str, dest: &Path) -> bool {
        match self.fetcher.download_to(url, dest).await {
            Ok(bytes) => {
                tune_info!("downloaded {} ({} bytes) to {}", url, bytes, dest.display());
                true
            }
            Err(err) => {
                tune_warn!("download of {} failed: {}", url, err);
                false
            }
        }
    }
}
