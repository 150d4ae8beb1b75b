use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tunefetch_core::{Command, Msg};
use tunefetch_logging::{tune_debug, tune_info, tune_warn};

use crate::orchestrator::Orchestrator;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum BotCommand {
    #[command(description = "greeting")]
    Start,
    #[command(description = "usage")]
    Help,
}

impl From<BotCommand> for Command {
    fn from(command: BotCommand) -> Self {
        match command {
            BotCommand::Start => Command::Start,
            BotCommand::Help => Command::Help,
        }
    }
}

/// The bot's own username, used to recognise `/command@username`.
#[derive(Clone, Debug)]
pub struct BotIdentity(pub String);

/// Maps an incoming text message to a conversation message.
///
/// Arguments after a known command are ignored; any other `/word` is an
/// unknown command and everything else is a search query.
pub fn classify_text(text: &str, bot_name: &str) -> Msg {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('/') {
        return Msg::TextReceived(text.to_string());
    }
    let head = trimmed.split_whitespace().next().unwrap_or(trimmed);
    match BotCommand::parse(head, bot_name) {
        Ok(command) => Msg::CommandReceived(command.into()),
        Err(_) => Msg::UnknownCommand,
    }
}

/// Long-polls Telegram until Ctrl-C. Updates are distributed per chat, so a
/// conversation's updates are handled one at a time and in order.
pub async fn run_bot(bot: Bot, orchestrator: Arc<Orchestrator>, identity: BotIdentity) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    tune_info!("bot @{} polling for updates", identity.0);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![orchestrator, identity])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_message(
    msg: Message,
    orchestrator: Arc<Orchestrator>,
    identity: BotIdentity,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        tune_debug!("chat {} ignoring non-text message", msg.chat.id.0);
        return Ok(());
    };
    orchestrator
        .handle(msg.chat.id.0, classify_text(text, &identity.0))
        .await;
    Ok(())
}

async fn on_callback(
    bot: Bot,
    q: CallbackQuery,
    orchestrator: Arc<Orchestrator>,
) -> ResponseResult<()> {
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        tune_warn!("callback acknowledgement failed: {}", err);
    }
    let Some(message) = q.message else {
        tune_debug!("callback {} without message", q.id);
        return Ok(());
    };
    let payload = q.data.unwrap_or_default();
    orchestrator
        .handle(
            message.chat.id.0,
            Msg::ChoicePressed {
                menu: Some(message.id.0),
                payload,
            },
        )
        .await;
    Ok(())
}
