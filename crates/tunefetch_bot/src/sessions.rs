use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tunefetch_core::Conversation;

use crate::transport::ChatKey;

/// Conversation state keyed by chat. Each conversation has its own async lock,
/// held while one incoming update is processed end to end.
#[derive(Debug, Default)]
pub struct SessionStore {
    conversations: Mutex<HashMap<ChatKey, Arc<AsyncMutex<Conversation>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the conversation for `chat`, creating an idle one on first use.
    pub fn conversation(&self, chat: ChatKey) -> Arc<AsyncMutex<Conversation>> {
        let mut map = self
            .conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(chat).or_default())
    }

    /// Copy of the current state, if the chat has talked to us before.
    pub async fn snapshot(&self, chat: ChatKey) -> Option<Conversation> {
        let conversation = {
            let map = self
                .conversations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            map.get(&chat).cloned()
        }?;
        let guard = conversation.lock().await;
        Some(guard.clone())
    }

    pub fn len(&self) -> usize {
        self.conversations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
