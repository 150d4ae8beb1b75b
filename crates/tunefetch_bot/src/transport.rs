//! The chat side of the bot, abstracted so the orchestrator can run against
//! Telegram in production and a recording fake in tests.

use std::path::Path;

use thiserror::Error;
use tunefetch_core::ChoiceButton;

/// Conversation identity (a Telegram chat id).
pub type ChatKey = i64;
/// Message identity within a chat.
pub type MessageKey = i32;

#[derive(Debug, Error)]
#[error("chat transport error: {0}")]
pub struct TransportError(pub String);

#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat: ChatKey, text: &str) -> Result<MessageKey, TransportError>;

    async fn edit_text(
        &self,
        chat: ChatKey,
        message: MessageKey,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Posts `text` with one inline button per row.
    async fn send_menu(
        &self,
        chat: ChatKey,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<MessageKey, TransportError>;

    /// Uploads `file` as an audio attachment with `title` as display name.
    async fn send_audio(&self, chat: ChatKey, file: &Path, title: &str)
        -> Result<(), TransportError>;
}
