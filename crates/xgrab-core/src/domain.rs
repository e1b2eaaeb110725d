/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Where pipeline replies go: the chat, quoting the triggering message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplyTarget {
    pub chat_id: ChatId,
    pub reply_to: MessageId,
}

/// A tweet/status identifier: 1-20 digits, captured from message text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TweetId(pub String);

impl std::fmt::Display for TweetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Animation,
    Video,
}

/// One media attachment as reported by the extraction service.
///
/// `size_bytes` is not populated from the metadata payload; the deliverer
/// re-queries it with a header-only request when the size actually matters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
    pub size_bytes: Option<u64>,
}

/// A media list partitioned by kind, input order preserved within each group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaGroups {
    pub photos: Vec<MediaItem>,
    pub animations: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
}

impl MediaGroups {
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.animations.is_empty() && self.videos.is_empty()
    }
}

/// Delivery tier for a single video, decided once from its byte size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryPlan {
    /// The platform fetches and sends the video by URL itself.
    StreamByUrl,
    /// Download locally and push the bytes as an uploaded file.
    ReuploadFile,
    /// Too large for any transfer; reply with the raw URL.
    LinkOnly,
}

/// Per-message delivery result: how many items went out, and what failed.
#[derive(Clone, Debug, Default)]
pub struct DeliveryOutcome {
    pub delivered: usize,
    pub failures: Vec<String>,
}
