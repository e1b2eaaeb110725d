use std::{path::Path, time::Duration};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use xgrab_core::{ports::MediaProbe, Error, Result};

use crate::{build_client, http_err};

/// Raw HTTP access to media URLs: existence probes, size lookups, downloads.
#[derive(Clone, Debug)]
pub struct HttpMediaProbe {
    http: reqwest::Client,
    download_timeout: Duration,
}

impl HttpMediaProbe {
    /// `timeout` bounds header-only calls; `download_timeout` bounds full
    /// video downloads, which legitimately take much longer.
    pub fn new(timeout: Duration, download_timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            download_timeout,
        })
    }
}

#[async_trait]
impl MediaProbe for HttpMediaProbe {
    async fn head_ok(&self, url: &str) -> Result<bool> {
        let resp = self.http.head(url).send().await.map_err(http_err)?;
        Ok(resp.status().is_success())
    }

    async fn content_length(&self, url: &str) -> Result<u64> {
        // Plain GET, but only the headers are read; dropping the response
        // before the body keeps this cheap.
        let resp = self.http.get(url).send().await.map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{status} for {url}")));
        }
        resp.content_length()
            .ok_or_else(|| Error::Fetch(format!("missing Content-Length for {url}")))
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<()> {
        let mut resp = self
            .http
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{status} for {url}")));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        while let Some(chunk) = resp.chunk().await.map_err(http_err)? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}
