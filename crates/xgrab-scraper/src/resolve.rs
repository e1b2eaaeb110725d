use std::time::Duration;

use async_trait::async_trait;

use xgrab_core::{ports::LinkResolver, Error, Result};

use crate::build_client;

/// Resolves t.co short links by following redirects to the final URL.
#[derive(Clone, Debug)]
pub struct TcoResolver {
    http: reqwest::Client,
}

impl TcoResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl LinkResolver for TcoResolver {
    async fn resolve(&self, short_link: &str) -> Result<String> {
        let resp = self
            .http
            .get(format!("https://{short_link}"))
            .send()
            .await
            .map_err(|e| Error::Resolution(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::Resolution(format!(
                "{} resolving {short_link}",
                resp.status()
            )));
        }

        // reqwest follows redirects by default; the response URL is the
        // final destination after unshortening.
        Ok(resp.url().to_string())
    }
}
