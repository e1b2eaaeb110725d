//! Telegram update handlers.
//!
//! Commands get short canned replies; any other text goes through the media
//! pipeline. Replies always quote the triggering message.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(message_text) = msg.text() else {
        // Photos/stickers/etc: nothing to extract from.
        return Ok(());
    };

    if message_text.starts_with('/') {
        return commands::handle_command(bot, msg, state).await;
    }

    text::handle_text(msg, state).await
}
