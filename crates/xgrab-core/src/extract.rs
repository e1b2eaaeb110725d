use std::collections::HashSet;

use regex::Regex;
use tracing::{info, warn};

use crate::{domain::TweetId, ports::LinkResolver};

/// Extract tweet ids from free-form message text.
///
/// Known t.co short links are resolved first (best-effort; a failed
/// resolution is logged and skipped) and their destinations appended to the
/// text, so ids hidden behind the shortener are still found. The result is
/// deduplicated preserving first-seen order. Empty means "no valid ids".
pub async fn extract_tweet_ids(text: &str, resolver: &dyn LinkResolver) -> Vec<TweetId> {
    let short_re = Regex::new(r"t\.co/[a-zA-Z0-9]+").expect("valid regex");

    let mut blob = text.to_string();
    for m in short_re.find_iter(text) {
        match resolver.resolve(m.as_str()).await {
            Ok(dest) => {
                info!("unshortened t.co link [https://{} -> {dest}]", m.as_str());
                blob.push('\n');
                blob.push_str(&dest);
            }
            Err(e) => {
                warn!("could not unshorten link [https://{}]: {e}", m.as_str());
            }
        }
    }

    let id_re = Regex::new(r"(?:twitter|x)\.com/.{1,15}/(?:web|status(?:es)?)/([0-9]{1,20})")
        .expect("valid regex");

    let mut seen: HashSet<String> = HashSet::new();
    let mut ids = Vec::new();
    for cap in id_re.captures_iter(&blob) {
        let id = cap[1].to_string();
        if seen.insert(id.clone()) {
            ids.push(TweetId(id));
        }
    }
    ids
}
