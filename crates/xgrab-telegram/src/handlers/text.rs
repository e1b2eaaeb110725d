use std::sync::Arc;

use teloxide::prelude::*;

use xgrab_core::domain::{ChatId, MessageId, ReplyTarget};

use crate::router::AppState;

pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text().map(|s| s.to_string()) else {
        return Ok(());
    };

    let target = ReplyTarget {
        chat_id: ChatId(msg.chat.id.0),
        reply_to: MessageId(msg.id.0),
    };

    // The pipeline never fails the handler: per-tweet errors become short
    // replies, everything else is logged.
    state.pipeline.handle_text(target, &text).await;
    Ok(())
}
