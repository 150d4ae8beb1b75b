#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tunefetch_bot::{ChatKey, ChatTransport, MessageKey, TransportError};
use tunefetch_core::ChoiceButton;
use tunefetch_engine::{Candidate, TrackInfo, TrackSource};

/// Everything the orchestrator asked the chat to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat: ChatKey,
        id: MessageKey,
        text: String,
    },
    Edit {
        chat: ChatKey,
        id: MessageKey,
        text: String,
    },
    Menu {
        chat: ChatKey,
        id: MessageKey,
        text: String,
        buttons: Vec<ChoiceButton>,
    },
    Audio {
        chat: ChatKey,
        path: PathBuf,
        title: String,
        bytes: Option<Vec<u8>>,
    },
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    next_id: AtomicI32,
    reject_audio: bool,
    audio_delay: Option<(ChatKey, Duration)>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_audio() -> Self {
        Self {
            reject_audio: true,
            ..Self::default()
        }
    }

    /// Holds uploads for `chat` for `delay` before reading the file.
    pub fn delaying_audio(chat: ChatKey, delay: Duration) -> Self {
        Self {
            audio_delay: Some((chat, delay)),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    fn next_id(&self) -> MessageKey {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait::async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat: ChatKey, text: &str) -> Result<MessageKey, TransportError> {
        let id = self.next_id();
        self.record(Sent::Text {
            chat,
            id,
            text: text.to_string(),
        });
        Ok(id)
    }

    async fn edit_text(
        &self,
        chat: ChatKey,
        message: MessageKey,
        text: &str,
    ) -> Result<(), TransportError> {
        self.record(Sent::Edit {
            chat,
            id: message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_menu(
        &self,
        chat: ChatKey,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<MessageKey, TransportError> {
        let id = self.next_id();
        self.record(Sent::Menu {
            chat,
            id,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(id)
    }

    async fn send_audio(
        &self,
        chat: ChatKey,
        file: &Path,
        title: &str,
    ) -> Result<(), TransportError> {
        if let Some((slow_chat, delay)) = self.audio_delay {
            if slow_chat == chat {
                tokio::time::sleep(delay).await;
            }
        }
        self.record(Sent::Audio {
            chat,
            path: file.to_path_buf(),
            title: title.to_string(),
            bytes: std::fs::read(file).ok(),
        });
        if self.reject_audio {
            return Err(TransportError("audio rejected".into()));
        }
        Ok(())
    }
}

/// Lets a test hold a download open and observe when it started.
#[derive(Debug, Default)]
pub struct DownloadGate {
    pub started: Notify,
    pub release: Notify,
}

/// Canned [`TrackSource`]. Downloads write a few bytes to the destination even
/// when they report failure, like an interrupted transfer would.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub candidates: Vec<Candidate>,
    pub recovered: Option<TrackInfo>,
    pub download_ok: bool,
    pub gate: Option<Arc<DownloadGate>>,
    pub downloads: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeSource {
    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TrackSource for FakeSource {
    async fn search(&self, _query: &str) -> Vec<Candidate> {
        self.candidates.clone()
    }

    async fn extract(&self, _page_url: &str) -> Option<TrackInfo> {
        self.recovered.clone()
    }

    async fn download(&self, audio_url: &str, dest: &Path) -> bool {
        self.downloads
            .lock()
            .unwrap()
            .push((audio_url.to_string(), dest.to_path_buf()));
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        tokio::fs::write(dest, b"ID3partial").await.is_ok() && self.download_ok
    }
}

/// Path of the first uploaded audio file, if any.
pub fn audio_path(sent: &[Sent]) -> Option<PathBuf> {
    sent.iter().find_map(|sent| match sent {
        Sent::Audio { path, .. } => Some(path.clone()),
        _ => None,
    })
}

pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

pub fn candidate(title: &str, page_url: &str, audio_url: Option<&str>) -> Candidate {
    Candidate {
        title: title.to_string(),
        page_url: page_url.to_string(),
        audio_url: audio_url.map(str::to_string),
    }
}
