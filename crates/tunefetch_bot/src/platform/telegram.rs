use std::path::Path;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId};
use tunefetch_core::ChoiceButton;

use crate::transport::{ChatKey, ChatTransport, MessageKey, TransportError};

/// [`ChatTransport`] over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn transport_error(err: teloxide::RequestError) -> TransportError {
    TransportError(err.to_string())
}

fn menu_markup(buttons: &[ChoiceButton]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(buttons.iter().map(|button| {
        [InlineKeyboardButton::callback(
            button.label.clone(),
            button.payload.clone(),
        )]
    }))
}

#[async_trait::async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat: ChatKey, text: &str) -> Result<MessageKey, TransportError> {
        let message = self
            .bot
            .send_message(ChatId(chat), text)
            .await
            .map_err(transport_error)?;
        Ok(message.id.0)
    }

    async fn edit_text(
        &self,
        chat: ChatKey,
        message: MessageKey,
        text: &str,
    ) -> Result<(), TransportError> {
        self.bot
            .edit_message_text(ChatId(chat), MessageId(message), text)
            .await
            .map_err(transport_error)?;
        Ok(())
    }

    async fn send_menu(
        &self,
        chat: ChatKey,
        text: &str,
        buttons: &[ChoiceButton],
    ) -> Result<MessageKey, TransportError> {
        let message = self
            .bot
            .send_message(ChatId(chat), text)
            .reply_markup(menu_markup(buttons))
            .await
            .map_err(transport_error)?;
        Ok(message.id.0)
    }

    async fn send_audio(
        &self,
        chat: ChatKey,
        file: &Path,
        title: &str,
    ) -> Result<(), TransportError> {
        self.bot
            .send_audio(ChatId(chat), InputFile::file(file.to_path_buf()))
            .title(title)
            .await
            .map_err(transport_error)?;
        Ok(())
    }
}
