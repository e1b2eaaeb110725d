use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    classify::group_media,
    deliver::Deliverer,
    domain::ReplyTarget,
    extract::extract_tweet_ids,
    ports::{LinkResolver, MediaFetcher, MediaSink},
    Error,
};

/// Drives one message end-to-end: extract ids, fetch metadata, classify,
/// deliver. Failures are isolated per tweet; nothing here is fatal.
pub struct Pipeline {
    resolver: Arc<dyn LinkResolver>,
    fetcher: Arc<dyn MediaFetcher>,
    sink: Arc<dyn MediaSink>,
    deliverer: Deliverer,
}

impl Pipeline {
    pub fn new(
        resolver: Arc<dyn LinkResolver>,
        fetcher: Arc<dyn MediaFetcher>,
        sink: Arc<dyn MediaSink>,
        deliverer: Deliverer,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            sink,
            deliverer,
        }
    }

    pub async fn handle_text(&self, to: ReplyTarget, text: &str) {
        let ids = extract_tweet_ids(text, self.resolver.as_ref()).await;
        if ids.is_empty() {
            self.reply(to, "No valid tweet IDs found.").await;
            return;
        }

        for id in &ids {
            info!("processing tweet {id}");
            match self.fetcher.scrape_media(id).await {
                Ok(items) => {
                    let groups = group_media(items);
                    if groups.is_empty() {
                        self.reply(to, "No supported media found.").await;
                        continue;
                    }

                    let outcome = self.deliverer.deliver(to, groups).await;
                    info!(
                        "tweet {id}: delivered {} item(s), {} failure(s)",
                        outcome.delivered,
                        outcome.failures.len()
                    );
                    for failure in &outcome.failures {
                        warn!("tweet {id}: {failure}");
                    }
                    // Send failures are not silent: the user gets one generic
                    // failure reply per tweet, full detail stays in the log.
                    if !outcome.failures.is_empty() {
                        let e = Error::Delivery(outcome.failures.join("; "));
                        self.reply(to, &e.user_reply()).await;
                    }
                }
                Err(e @ (Error::Fetch(_) | Error::Api(_))) => {
                    warn!("tweet {id}: {e}");
                    self.reply(to, &e.user_reply()).await;
                }
                Err(e) => {
                    error!("tweet {id}: unexpected error: {e}");
                    self.reply(to, &e.user_reply()).await;
                }
            }
        }
    }

    /// Best-effort reply; a failed reply is logged, never propagated.
    async fn reply(&self, to: ReplyTarget, text: &str) {
        if let Err(e) = self.sink.send_text(to, text).await {
            warn!("reply send failed: {e}");
        }
    }
}
