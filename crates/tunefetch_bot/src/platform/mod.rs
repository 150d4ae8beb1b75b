mod app;
mod telegram;

pub use app::{classify_text, run_bot, BotCommand, BotIdentity};
pub use telegram::TelegramTransport;
