use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{MediaItem, MessageRef, ReplyTarget, TweetId},
    Result,
};

/// Resolves a `t.co/<token>` short link to its redirect destination.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// `short_link` is the bare matched text (no scheme), e.g. `t.co/abc123`.
    async fn resolve(&self, short_link: &str) -> Result<String>;
}

/// Fetches structured media metadata for one tweet from the extraction service.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn scrape_media(&self, id: &TweetId) -> Result<Vec<MediaItem>>;
}

/// HTTP side-channel used by the deliverer: existence probes, size lookups
/// and streaming downloads against media URLs.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Lightweight existence check: does a HEAD on `url` come back 2xx?
    async fn head_ok(&self, url: &str) -> Result<bool>;

    /// `Content-Length` of `url`, read from response headers of a streaming
    /// GET without consuming the body.
    async fn content_length(&self, url: &str) -> Result<u64>;

    /// Stream the full body of `url` into `dest`.
    async fn download_to(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Chat-platform capability surface consumed by the pipeline.
///
/// Telegram is the only implementation today; the shape mirrors exactly the
/// calls the deliverer needs, nothing more.
#[async_trait]
pub trait MediaSink: Send + Sync {
    async fn send_text(&self, to: ReplyTarget, text: &str) -> Result<MessageRef>;

    /// Send all photo URLs as one grouped message. All-or-nothing.
    async fn send_photo_group(&self, to: ReplyTarget, urls: &[String]) -> Result<()>;

    async fn send_animation(&self, to: ReplyTarget, url: &str) -> Result<()>;

    /// Ask the platform to fetch and send the video by URL itself.
    async fn send_video_url(&self, to: ReplyTarget, url: &str) -> Result<()>;

    /// Upload a locally downloaded video file, progressive playback enabled.
    async fn send_video_file(&self, to: ReplyTarget, path: &Path) -> Result<()>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;
}
