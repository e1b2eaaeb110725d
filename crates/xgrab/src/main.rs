use std::sync::Arc;

use teloxide::Bot;

use xgrab_core::{config::Config, deliver::Deliverer, pipeline::Pipeline, stats::StatsStore};
use xgrab_scraper::{HttpMediaProbe, TcoResolver, VxClient};
use xgrab_telegram::TelegramSink;

mod health;

#[tokio::main]
async fn main() -> Result<(), xgrab_core::Error> {
    xgrab_core::logging::init("xgrab");

    let cfg = Arc::new(Config::load()?);
    let stats = Arc::new(StatsStore::load(cfg.stats_file.clone()));

    let resolver = Arc::new(TcoResolver::new(cfg.http_timeout)?);
    let fetcher = Arc::new(VxClient::new(cfg.vx_api_base_url.clone(), cfg.http_timeout)?);
    let probe = Arc::new(HttpMediaProbe::new(cfg.http_timeout, cfg.download_timeout)?);

    let bot = Bot::new(cfg.bot_token.clone());
    let sink = Arc::new(TelegramSink::new(bot.clone()));

    let deliverer = Deliverer::new(
        sink.clone(),
        probe,
        stats.clone(),
        cfg.limits,
        cfg.temp_dir.clone(),
    );
    let pipeline = Arc::new(Pipeline::new(resolver, fetcher, sink, deliverer));

    if let Some(addr) = cfg.health_addr {
        let stats = stats.clone();
        tokio::spawn(async move {
            if let Err(e) = health::serve(addr, stats).await {
                tracing::error!("health endpoint failed: {e}");
            }
        });
    }

    xgrab_telegram::router::run_polling(bot, cfg, pipeline, stats)
        .await
        .map_err(|e| xgrab_core::Error::Unexpected(format!("telegram bot failed: {e}")))?;

    Ok(())
}
