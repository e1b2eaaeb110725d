use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let (cmd, _arg) = parse_command(text);

    let reply = match cmd.as_str() {
        "start" | "help" => "Send me a tweet link (twitter.com, x.com or t.co) and I'll reply \
                             with its photos, GIFs and videos.\n\n\
                             /stats - Show how many media files were delivered"
            .to_string(),
        "stats" => format!("Media downloaded: {}", state.stats.media_downloaded()),
        _ => format!("Unknown command: /{cmd}"),
    };

    bot.send_message(msg.chat.id, reply)
        .reply_to_message_id(msg.id)
        .await?;
    Ok(())
}
