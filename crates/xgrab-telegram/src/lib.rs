//! Telegram adapter (teloxide).
//!
//! Implements the `xgrab-core` MediaSink port over the Telegram Bot API.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, InputMedia, InputMediaDocument},
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use xgrab_core::{
    domain::{ChatId, MessageId, MessageRef, ReplyTarget},
    errors::Error,
    ports::MediaSink,
    Result,
};

#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }

    fn media_url(url: &str) -> Result<url::Url> {
        url::Url::parse(url).map_err(|e| Error::Delivery(format!("invalid media url {url}: {e}")))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MediaSink for TelegramSink {
    async fn send_text(&self, to: ReplyTarget, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::tg_chat(to.chat_id), text.to_string())
                    .reply_to_message_id(Self::tg_msg_id(to.reply_to))
            })
            .await?;

        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_photo_group(&self, to: ReplyTarget, urls: &[String]) -> Result<()> {
        // Documents rather than photos: Telegram recompresses photos, and the
        // whole point of the quality upgrade is the untouched file.
        let mut group = Vec::with_capacity(urls.len());
        for url in urls {
            group.push(InputMedia::Document(InputMediaDocument::new(
                InputFile::url(Self::media_url(url)?),
            )));
        }

        self.with_retry(|| {
            self.bot
                .send_media_group(Self::tg_chat(to.chat_id), group.clone())
                .reply_to_message_id(Self::tg_msg_id(to.reply_to))
        })
        .await?;
        Ok(())
    }

    async fn send_animation(&self, to: ReplyTarget, url: &str) -> Result<()> {
        let file = InputFile::url(Self::media_url(url)?);
        self.with_retry(|| {
            self.bot
                .send_animation(Self::tg_chat(to.chat_id), file.clone())
                .reply_to_message_id(Self::tg_msg_id(to.reply_to))
        })
        .await?;
        Ok(())
    }

    async fn send_video_url(&self, to: ReplyTarget, url: &str) -> Result<()> {
        let file = InputFile::url(Self::media_url(url)?);
        self.with_retry(|| {
            self.bot
                .send_video(Self::tg_chat(to.chat_id), file.clone())
                .reply_to_message_id(Self::tg_msg_id(to.reply_to))
        })
        .await?;
        Ok(())
    }

    async fn send_video_file(&self, to: ReplyTarget, path: &Path) -> Result<()> {
        let file = InputFile::file(path.to_path_buf());
        self.with_retry(|| {
            self.bot
                .send_video(Self::tg_chat(to.chat_id), file.clone())
                .supports_streaming(true)
                .reply_to_message_id(Self::tg_msg_id(to.reply_to))
        })
        .await?;
        Ok(())
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.with_retry(|| {
            self.bot
                .delete_message(Self::tg_chat(msg.chat_id), Self::tg_msg_id(msg.message_id))
        })
        .await?;
        Ok(())
    }
}
