use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use xgrab_core::{
    domain::{MediaItem, MediaKind, TweetId},
    ports::MediaFetcher,
    Error, Result,
};

use crate::{build_client, http_err};

/// Client for the vxtwitter extraction service.
#[derive(Clone, Debug)]
pub struct VxClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VxResponse {
    media_extended: Vec<VxMedia>,
}

#[derive(Debug, Deserialize)]
struct VxMedia {
    #[serde(rename = "type")]
    kind: String,
    url: String,
}

impl VxClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MediaFetcher for VxClient {
    async fn scrape_media(&self, id: &TweetId) -> Result<Vec<MediaItem>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), id);
        let resp = self.http.get(&url).send().await.map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{status} for tweet {id}")));
        }

        let body = resp.text().await.map_err(http_err)?;
        parse_media_response(&body, id)
    }
}

fn parse_media_response(body: &str, id: &TweetId) -> Result<Vec<MediaItem>> {
    match serde_json::from_str::<VxResponse>(body) {
        Ok(parsed) => Ok(parsed
            .media_extended
            .into_iter()
            .filter_map(into_media_item)
            .collect()),
        // The service degrades to an HTML error page; try to surface its
        // own error description before giving up.
        Err(_) => match extract_api_error(body) {
            Some(message) => Err(Error::Api(message)),
            None => Err(Error::Fetch(format!("unparseable response for tweet {id}"))),
        },
    }
}

fn into_media_item(media: VxMedia) -> Option<MediaItem> {
    let kind = match media.kind.as_str() {
        "image" => MediaKind::Photo,
        "gif" => MediaKind::Animation,
        "video" => MediaKind::Video,
        other => {
            warn!("skipping media of unknown type {other:?}: {}", media.url);
            return None;
        }
    };
    // Byte size is intentionally left unset; the deliverer re-queries it
    // with a header-only request when a video actually gets delivered.
    Some(MediaItem {
        kind,
        url: media.url,
        size_bytes: None,
    })
}

/// Pull the service's own error description out of an HTML fallback page.
fn extract_api_error(body: &str) -> Option<String> {
    let re = Regex::new(r#"<meta content="(.*?)" property="og:description" />"#)
        .expect("valid regex");
    re.captures(body)
        .map(|cap| html_unescape(&cap[1]))
}

/// Decode the entities that show up in the service's error pages.
fn html_unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let Some(end) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        // Another '&' may sit between this one and the ';'; the entity can
        // only start at the last one. Everything before it is literal.
        let amp = rest[..end].rfind('&').unwrap_or(0);
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let end = end - amp;
        let entity = &rest[..=end];
        match entity {
            "&amp;" => out.push('&'),
            "&lt;" => out.push('<'),
            "&gt;" => out.push('>'),
            "&quot;" => out.push('"'),
            "&#39;" | "&apos;" => out.push('\''),
            _ => {
                let decoded = entity
                    .strip_prefix("&#")
                    .and_then(|e| e.strip_suffix(';'))
                    .and_then(|num| num.parse::<u32>().ok())
                    .and_then(char::from_u32);
                match decoded {
                    Some(c) => out.push(c),
                    None => out.push_str(entity),
                }
            }
        }
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}
