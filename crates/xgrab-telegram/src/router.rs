use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use xgrab_core::{config::Config, pipeline::Pipeline, stats::StatsStore};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    pub stats: Arc<StatsStore>,
}

/// Run the bot with long polling until the process is terminated.
///
/// Each incoming update is dispatched as its own tokio task, which gives the
/// task-per-message concurrency model; the only cross-message state is the
/// atomic stats counter inside `AppState`.
pub async fn run_polling(
    bot: Bot,
    cfg: Arc<Config>,
    pipeline: Arc<Pipeline>,
    stats: Arc<StatsStore>,
) -> anyhow::Result<()> {
    if let Ok(me) = bot.get_me().await {
        println!("xgrab started: @{}", me.username());
    }
    println!("Media downloaded so far: {}", stats.media_downloaded());

    let state = Arc::new(AppState {
        cfg,
        pipeline,
        stats,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
