use std::{path::PathBuf, sync::Arc};

use tracing::{info, warn};

use crate::{
    domain::{DeliveryOutcome, DeliveryPlan, MediaGroups, MediaItem, ReplyTarget},
    plan::{plan_video, SizeLimits},
    ports::{MediaProbe, MediaSink},
    quality::with_original_quality,
    stats::StatsStore,
    Result,
};

/// Executes delivery of classified media against the chat platform.
pub struct Deliverer {
    sink: Arc<dyn MediaSink>,
    probe: Arc<dyn MediaProbe>,
    stats: Arc<StatsStore>,
    limits: SizeLimits,
    temp_dir: PathBuf,
}

impl Deliverer {
    pub fn new(
        sink: Arc<dyn MediaSink>,
        probe: Arc<dyn MediaProbe>,
        stats: Arc<StatsStore>,
        limits: SizeLimits,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            sink,
            probe,
            stats,
            limits,
            temp_dir,
        }
    }

    /// Deliver all supported media for one tweet, best-effort per item.
    ///
    /// Videos are only processed when the animations group is empty. That
    /// mirrors the long-standing behavior of this bot; whether a post with
    /// both should also get its videos is an open product question.
    pub async fn deliver(&self, to: ReplyTarget, groups: MediaGroups) -> DeliveryOutcome {
        let mut outcome = DeliveryOutcome::default();

        if !groups.photos.is_empty() {
            self.deliver_photos(to, &groups.photos, &mut outcome).await;
        }
        if !groups.animations.is_empty() {
            self.deliver_animations(to, &groups.animations, &mut outcome)
                .await;
        } else if !groups.videos.is_empty() {
            self.deliver_videos(to, &groups.videos, &mut outcome).await;
        }

        outcome
    }

    /// Send all photos as one grouped message, upgrading each URL to the
    /// original-quality variant when the upgraded URL actually exists.
    async fn deliver_photos(
        &self,
        to: ReplyTarget,
        photos: &[MediaItem],
        outcome: &mut DeliveryOutcome,
    ) {
        let mut urls = Vec::with_capacity(photos.len());
        for photo in photos {
            let upgraded = with_original_quality(&photo.url);
            let use_upgraded = match self.probe.head_ok(&upgraded).await {
                Ok(ok) => ok,
                Err(e) => {
                    warn!("quality probe failed for {upgraded}: {e}");
                    false
                }
            };
            if use_upgraded {
                info!("using original-quality photo url: {upgraded}");
                urls.push(upgraded);
            } else {
                info!("orig quality not available, using original url: {}", photo.url);
                urls.push(photo.url.clone());
            }
        }

        // The group send is all-or-nothing; per-photo isolation stops here.
        match self.sink.send_photo_group(to, &urls).await {
            Ok(()) => {
                info!("sent photo group (len {})", urls.len());
                outcome.delivered += urls.len();
                self.stats.add_media_downloaded(urls.len() as u64);
            }
            Err(e) => {
                warn!("photo group send failed: {e}");
                outcome.failures.push(format!("photo group: {e}"));
            }
        }
    }

    async fn deliver_animations(
        &self,
        to: ReplyTarget,
        animations: &[MediaItem],
        outcome: &mut DeliveryOutcome,
    ) {
        for gif in animations {
            match self.sink.send_animation(to, &gif.url).await {
                Ok(()) => {
                    info!("sent gif: {}", gif.url);
                    outcome.delivered += 1;
                    self.stats.add_media_downloaded(1);
                }
                Err(e) => {
                    warn!("gif send failed for {}: {e}", gif.url);
                    outcome.failures.push(format!("gif {}: {e}", gif.url));
                }
            }
        }
    }

    async fn deliver_videos(
        &self,
        to: ReplyTarget,
        videos: &[MediaItem],
        outcome: &mut DeliveryOutcome,
    ) {
        for video in videos {
            match self.deliver_one_video(to, &video.url).await {
                Ok(()) => {
                    outcome.delivered += 1;
                    self.stats.add_media_downloaded(1);
                }
                Err(e) => {
                    // Single downgrade: whatever went wrong, hand the user the
                    // raw URL. Not retried further.
                    warn!("video delivery failed for {}, sending direct link: {e}", video.url);
                    let text = format!(
                        "Error occurred when trying to send video. Direct link:\n{}",
                        video.url
                    );
                    match self.sink.send_text(to, &text).await {
                        Ok(_) => {
                            outcome.delivered += 1;
                            self.stats.add_media_downloaded(1);
                        }
                        Err(e2) => {
                            warn!("direct-link fallback failed for {}: {e2}", video.url);
                            outcome.failures.push(format!("video {}: {e}", video.url));
                        }
                    }
                }
            }
        }
    }

    async fn deliver_one_video(&self, to: ReplyTarget, url: &str) -> Result<()> {
        let size = self.probe.content_length(url).await?;

        match plan_video(size, self.limits) {
            DeliveryPlan::StreamByUrl => {
                self.sink.send_video_url(to, url).await?;
                info!("sent video by url ({size} bytes)");
            }
            DeliveryPlan::ReuploadFile => {
                info!(
                    "video size ({size}) is bigger than the download limit, using upload method"
                );
                self.reupload_video(to, url).await?;
            }
            DeliveryPlan::LinkOnly => {
                info!("video is too large ({size} bytes), sending direct link");
                let text =
                    format!("Video is too large for Telegram upload. Direct video link:\n{url}");
                self.sink.send_text(to, &text).await?;
            }
        }
        Ok(())
    }

    /// Download-and-reupload tier: interim notice, scoped temp file, streamed
    /// download, upload with progressive playback, then delete the notice.
    async fn reupload_video(&self, to: ReplyTarget, url: &str) -> Result<()> {
        let notice = self
            .sink
            .send_text(
                to,
                "Video is too large for direct download\nUsing upload method (this might take a bit longer)",
            )
            .await?;

        // NamedTempFile removes the file on drop, so every exit path below
        // (including download/upload errors) releases the buffer.
        let tmp = tempfile::Builder::new()
            .prefix("xgrab-video-")
            .suffix(".mp4")
            .tempfile_in(&self.temp_dir)?;

        info!("downloading video to {}", tmp.path().display());
        self.probe.download_to(url, tmp.path()).await?;

        info!("video downloaded, uploading to Telegram");
        self.sink.send_video_file(to, tmp.path()).await?;

        // Best-effort; a stale notice is not a delivery failure.
        if let Err(e) = self.sink.delete_message(notice).await {
            warn!("could not delete upload notice: {e}");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, MediaKind, MessageId, MessageRef},
        Error,
    };
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    const LIMITS: SizeLimits = SizeLimits {
        download_limit: 1_000,
        upload_limit: 2_000,
    };

    const TARGET: ReplyTarget = ReplyTarget {
        chat_id: ChatId(7),
        reply_to: MessageId(100),
    };

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum SinkCall {
        Text(String),
        PhotoGroup(Vec<String>),
        Animation(String),
        VideoUrl(String),
        VideoFile,
        Delete(MessageRef),
    }

    /// Recording sink; individual operations can be told to fail.
    #[derive(Default)]
    pub struct RecordingSink {
        pub calls: Mutex<Vec<SinkCall>>,
        pub fail_photo_group: bool,
        pub fail_video_url: bool,
        pub fail_animation: bool,
    }

    impl RecordingSink {
        pub fn calls(&self) -> Vec<SinkCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: SinkCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl MediaSink for RecordingSink {
        async fn send_text(&self, _to: ReplyTarget, text: &str) -> Result<MessageRef> {
            self.record(SinkCall::Text(text.to_string()));
            Ok(MessageRef {
                chat_id: TARGET.chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_photo_group(&self, _to: ReplyTarget, urls: &[String]) -> Result<()> {
            if self.fail_photo_group {
                return Err(Error::Delivery("group send rejected".to_string()));
            }
            self.record(SinkCall::PhotoGroup(urls.to_vec()));
            Ok(())
        }

        async fn send_animation(&self, _to: ReplyTarget, url: &str) -> Result<()> {
            if self.fail_animation {
                return Err(Error::Delivery("animation rejected".to_string()));
            }
            self.record(SinkCall::Animation(url.to_string()));
            Ok(())
        }

        async fn send_video_url(&self, _to: ReplyTarget, url: &str) -> Result<()> {
            if self.fail_video_url {
                return Err(Error::Delivery("video url rejected".to_string()));
            }
            self.record(SinkCall::VideoUrl(url.to_string()));
            Ok(())
        }

        async fn send_video_file(&self, _to: ReplyTarget, _path: &Path) -> Result<()> {
            self.record(SinkCall::VideoFile);
            Ok(())
        }

        async fn delete_message(&self, msg: MessageRef) -> Result<()> {
            self.record(SinkCall::Delete(msg));
            Ok(())
        }
    }

    /// Probe with a fixed content length and configurable HEAD verdict.
    pub struct StubProbe {
        pub head_ok: bool,
        pub content_length: Result<u64>,
    }

    impl StubProbe {
        pub fn sized(len: u64) -> Self {
            Self {
                head_ok: true,
                content_length: Ok(len),
            }
        }
    }

    #[async_trait]
    impl MediaProbe for StubProbe {
        async fn head_ok(&self, _url: &str) -> Result<bool> {
            Ok(self.head_ok)
        }

        async fn content_length(&self, _url: &str) -> Result<u64> {
            match &self.content_length {
                Ok(v) => Ok(*v),
                Err(_) => Err(Error::Fetch("no Content-Length".to_string())),
            }
        }

        async fn download_to(&self, _url: &str, dest: &Path) -> Result<()> {
            tokio::fs::write(dest, b"fake video bytes").await?;
            Ok(())
        }
    }

    fn item(kind: MediaKind, url: &str) -> MediaItem {
        MediaItem {
            kind,
            url: url.to_string(),
            size_bytes: None,
        }
    }

    fn deliverer(sink: Arc<RecordingSink>, probe: StubProbe) -> (Deliverer, Arc<StatsStore>) {
        let dir = std::env::temp_dir();
        let stats = Arc::new(StatsStore::load(dir.join(format!(
            "xgrab-test-stats-{}-{:p}.json",
            std::process::id(),
            Arc::as_ptr(&sink)
        ))));
        let d = Deliverer::new(sink, Arc::new(probe), stats.clone(), LIMITS, dir);
        (d, stats)
    }

    #[tokio::test]
    async fn photos_go_out_as_one_group_and_count_per_item() {
        let sink = Arc::new(RecordingSink::default());
        let (d, stats) = deliverer(sink.clone(), StubProbe::sized(0));

        let groups = MediaGroups {
            photos: vec![
                item(MediaKind::Photo, "https://pbs.twimg.com/media/a.jpg?name=small"),
                item(MediaKind::Photo, "https://pbs.twimg.com/media/b.jpg?name=small"),
            ],
            ..Default::default()
        };
        let before = stats.media_downloaded();
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(stats.media_downloaded() - before, 2);

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            SinkCall::PhotoGroup(vec![
                "https://pbs.twimg.com/media/a.jpg?format=jpg&name=orig".to_string(),
                "https://pbs.twimg.com/media/b.jpg?format=jpg&name=orig".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn failed_probe_keeps_original_photo_url() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(
            sink.clone(),
            StubProbe {
                head_ok: false,
                content_length: Ok(0),
            },
        );

        let groups = MediaGroups {
            photos: vec![item(
                MediaKind::Photo,
                "https://pbs.twimg.com/media/a.jpg?name=small",
            )],
            ..Default::default()
        };
        d.deliver(TARGET, groups).await;

        assert_eq!(
            sink.calls(),
            vec![SinkCall::PhotoGroup(vec![
                "https://pbs.twimg.com/media/a.jpg?name=small".to_string()
            ])]
        );
    }

    #[tokio::test]
    async fn animations_suppress_videos() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(sink.clone(), StubProbe::sized(10));

        let groups = MediaGroups {
            animations: vec![item(MediaKind::Animation, "https://v.example/gif1")],
            videos: vec![item(MediaKind::Video, "https://v.example/vid1")],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 1);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::Animation("https://v.example/gif1".to_string())]
        );
    }

    #[tokio::test]
    async fn one_failed_animation_does_not_block_the_rest() {
        let sink = Arc::new(RecordingSink {
            fail_animation: true,
            ..Default::default()
        });
        let (d, _) = deliverer(sink.clone(), StubProbe::sized(10));

        let groups = MediaGroups {
            animations: vec![
                item(MediaKind::Animation, "https://v.example/g1"),
                item(MediaKind::Animation, "https://v.example/g2"),
            ],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.failures.len(), 2);
    }

    #[tokio::test]
    async fn small_video_streams_by_url() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(sink.clone(), StubProbe::sized(LIMITS.download_limit));

        let groups = MediaGroups {
            videos: vec![item(MediaKind::Video, "https://v.example/small.mp4")],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 1);
        assert_eq!(
            sink.calls(),
            vec![SinkCall::VideoUrl("https://v.example/small.mp4".to_string())]
        );
    }

    #[tokio::test]
    async fn midsize_video_is_reuploaded_with_notice_lifecycle() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(sink.clone(), StubProbe::sized(LIMITS.download_limit + 1));

        let groups = MediaGroups {
            videos: vec![item(MediaKind::Video, "https://v.example/mid.mp4")],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 1);
        let calls = sink.calls();
        assert!(matches!(calls[0], SinkCall::Text(ref t) if t.contains("upload method")));
        assert_eq!(calls[1], SinkCall::VideoFile);
        assert!(matches!(calls[2], SinkCall::Delete(_)));
    }

    #[tokio::test]
    async fn oversized_video_sends_link_only() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(sink.clone(), StubProbe::sized(LIMITS.upload_limit + 1));

        let groups = MediaGroups {
            videos: vec![item(MediaKind::Video, "https://v.example/huge.mp4")],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 1);
        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            calls[0],
            SinkCall::Text(ref t)
                if t.contains("too large for Telegram upload")
                    && t.contains("https://v.example/huge.mp4")
        ));
    }

    #[tokio::test]
    async fn video_send_failure_downgrades_to_direct_link() {
        let sink = Arc::new(RecordingSink {
            fail_video_url: true,
            ..Default::default()
        });
        let (d, stats) = deliverer(sink.clone(), StubProbe::sized(10));

        let groups = MediaGroups {
            videos: vec![item(MediaKind::Video, "https://v.example/rejected.mp4")],
            ..Default::default()
        };
        let before = stats.media_downloaded();
        let outcome = d.deliver(TARGET, groups).await;

        // The link fallback counts as delivered, once.
        assert_eq!(outcome.delivered, 1);
        assert_eq!(stats.media_downloaded() - before, 1);
        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            calls[0],
            SinkCall::Text(ref t)
                if t.contains("Direct link:") && t.contains("https://v.example/rejected.mp4")
        ));
    }

    #[tokio::test]
    async fn missing_content_length_downgrades_to_direct_link() {
        let sink = Arc::new(RecordingSink::default());
        let (d, _) = deliverer(
            sink.clone(),
            StubProbe {
                head_ok: true,
                content_length: Err(Error::Fetch("no Content-Length".to_string())),
            },
        );

        let groups = MediaGroups {
            videos: vec![item(MediaKind::Video, "https://v.example/nolen.mp4")],
            ..Default::default()
        };
        let outcome = d.deliver(TARGET, groups).await;

        assert_eq!(outcome.delivered, 1);
        assert!(matches!(
            sink.calls()[0],
            SinkCall::Text(ref t) if t.contains("Direct link:")
        ));
    }
}
