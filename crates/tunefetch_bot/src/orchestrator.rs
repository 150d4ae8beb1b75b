use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use tunefetch_core::{update, DeliveryOutcome, Effect, Msg, Notice, TrackOption};
use tunefetch_engine::{Candidate, ScratchFile, TrackSource};
use tunefetch_logging::{tune_debug, tune_info, tune_warn};

use crate::sessions::SessionStore;
use crate::transport::{ChatKey, ChatTransport, MessageKey};

/// Runs the pure conversation state machine against the network and the chat.
///
/// One call to [`Orchestrator::handle`] processes one incoming update: the
/// message is applied, the resulting effects are executed in order, and any
/// completion message they produce is applied in turn until nothing is left.
pub struct Orchestrator {
    source: Arc<dyn TrackSource>,
    transport: Arc<dyn ChatTransport>,
    scratch_dir: PathBuf,
    sessions: SessionStore,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn TrackSource>,
        transport: Arc<dyn ChatTransport>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            transport,
            scratch_dir: scratch_dir.into(),
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn handle(&self, chat: ChatKey, msg: Msg) {
        let conversation = self.sessions.conversation(chat);
        let mut state = conversation.lock().await;
        let mut status: Option<MessageKey> = None;

        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            tune_debug!("chat {} phase={:?} msg={:?}", chat, state.phase(), msg);
            let (next, effects) = update(std::mem::take(&mut *state), msg);
            *state = next;
            for effect in effects {
                if let Some(follow_up) = self.run_effect(chat, effect, &mut status).await {
                    inbox.push_back(follow_up);
                }
            }
        }
    }

    async fn run_effect(
        &self,
        chat: ChatKey,
        effect: Effect,
        status: &mut Option<MessageKey>,
    ) -> Option<Msg> {
        match effect {
            Effect::Reply(notice) => {
                self.send(chat, &notice).await;
                None
            }
            Effect::PostStatus(notice) => {
                *status = self.send(chat, &notice).await;
                None
            }
            Effect::UpdateStatus(notice) => {
                self.update_status(chat, &notice, status).await;
                None
            }
            Effect::Search { query } => {
                tune_info!("chat {} searching for {:?}", chat, query);
                let options = self
                    .source
                    .search(&query)
                    .await
                    .into_iter()
                    .map(track_option)
                    .collect();
                Some(Msg::SearchFinished(options))
            }
            Effect::PresentChoices { buttons } => {
                let text = Notice::ChooseTrack.text();
                match self.transport.send_menu(chat, &text, &buttons).await {
                    Ok(menu) => Some(Msg::MenuPresented { menu }),
                    Err(err) => {
                        tune_warn!("chat {} menu not delivered: {}", chat, err);
                        None
                    }
                }
            }
            Effect::RecoverAudio { index, page_url } => {
                tune_info!("chat {} re-extracting {}", chat, page_url);
                let audio_url = self
                    .source
                    .extract(&page_url)
                    .await
                    .and_then(|info| info.audio_url);
                Some(Msg::AudioRecovered { index, audio_url })
            }
            Effect::Deliver { title, audio_url } => {
                let outcome = self.deliver(chat, &title, &audio_url).await;
                Some(Msg::DeliveryFinished { title, outcome })
            }
        }
    }

    async fn send(&self, chat: ChatKey, notice: &Notice) -> Option<MessageKey> {
        match self.transport.send_text(chat, &notice.text()).await {
            Ok(message) => Some(message),
            Err(err) => {
                tune_warn!("chat {} message not delivered: {}", chat, err);
                None
            }
        }
    }

    async fn update_status(&self, chat: ChatKey, notice: &Notice, status: &mut Option<MessageKey>) {
        if let Some(message) = *status {
            match self.transport.edit_text(chat, message, &notice.text()).await {
                Ok(()) => return,
                Err(err) => tune_debug!("chat {} status edit failed: {}", chat, err),
            }
        }
        *status = self.send(chat, notice).await;
    }

    async fn deliver(&self, chat: ChatKey, title: &str, audio_url: &str) -> DeliveryOutcome {
        let scratch = match ScratchFile::reserve(&self.scratch_dir, title) {
            Ok(scratch) => scratch,
            Err(err) => {
                tune_warn!("chat {} no scratch space for {:?}: {}", chat, title, err);
                return DeliveryOutcome::FetchFailed;
            }
        };

        let outcome = if !self.source.download(audio_url, scratch.path()).await {
            DeliveryOutcome::FetchFailed
        } else {
            match self.transport.send_audio(chat, scratch.path(), title).await {
                Ok(()) => DeliveryOutcome::Sent,
                Err(err) => {
                    tune_warn!("chat {} audio {:?} not delivered: {}", chat, title, err);
                    DeliveryOutcome::SendFailed
                }
            }
        };

        scratch.release();
        tune_info!("chat {} delivery of {:?}: {:?}", chat, title, outcome);
        outcome
    }
}

fn track_option(candidate: Candidate) -> TrackOption {
    let option = TrackOption::new(candidate.title, candidate.page_url);
    match candidate.audio_url {
        Some(audio_url) => option.with_audio(audio_url),
        None => option,
    }
}
