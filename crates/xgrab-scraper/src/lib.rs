//! HTTP adapters for the media pipeline (reqwest).
//!
//! Three concerns live here, each behind a core port: the vxtwitter
//! metadata client, the t.co redirect resolver, and the raw media probe
//! (existence checks, size lookups, streaming downloads).

mod probe;
mod resolve;
mod vx;

pub use probe::HttpMediaProbe;
pub use resolve::TcoResolver;
pub use vx::VxClient;

use std::time::Duration;

use xgrab_core::{Error, Result};

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("reqwest client build failed: {e}")))
}

pub(crate) fn http_err(e: reqwest::Error) -> Error {
    Error::Fetch(e.to_string())
}
