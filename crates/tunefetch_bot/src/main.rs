use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use tunefetch_bot::config::AppConfig;
use tunefetch_bot::logging::{self, LogSettings};
use tunefetch_bot::platform::{run_bot, BotIdentity, TelegramTransport};
use tunefetch_bot::{liveness, Orchestrator};
use tunefetch_engine::{ensure_scratch_dir, ScrapeEngine};
use tunefetch_logging::{tune_error, tune_info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize(&LogSettings::from_env());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tune_error!("configuration error: {}", err);
            return Err(err.into());
        }
    };
    tune_info!("starting with {:?}", config);

    ensure_scratch_dir(&config.scratch_dir).context("scratch directory")?;

    let server = liveness::spawn(config.liveness_port)
        .with_context(|| format!("binding liveness port {}", config.liveness_port))?;
    tune_info!("liveness endpoint on {}", server.local_addr());

    let engine = ScrapeEngine::new(config.engine_config()).context("search engine setup")?;

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("fetching bot identity")?;
    let identity = BotIdentity(me.username().to_string());

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(engine),
        Arc::new(TelegramTransport::new(bot.clone())),
        config.scratch_dir.clone(),
    ));

    run_bot(bot, orchestrator, identity).await;
    tune_info!("shutting down");
    Ok(())
}
