use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, plan::SizeLimits, Result};

/// Telegram Bot API limit for server-side downloads (sendVideo by URL).
pub const DEFAULT_DOWNLOAD_LIMIT: u64 = 20 * 1024 * 1024;
/// Telegram Bot API limit for client uploads.
pub const DEFAULT_UPLOAD_LIMIT: u64 = 50 * 1024 * 1024;

const DEFAULT_VX_API_BASE_URL: &str = "https://api.vxtwitter.com/Twitter/status";

/// Typed configuration, loaded from the environment (with optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,

    /// Extraction-service endpoint; the tweet id is appended as a path segment.
    pub vx_api_base_url: String,

    /// Platform byte thresholds driving the video delivery tiers.
    pub limits: SizeLimits,

    /// Bounded timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,

    /// Looser bound for full video downloads, which legitimately run long.
    pub download_timeout: Duration,

    pub stats_file: PathBuf,
    pub temp_dir: PathBuf,

    /// Bind address for the health endpoint; unset disables it.
    pub health_addr: Option<SocketAddr>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let vx_api_base_url = env_str("VX_API_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_VX_API_BASE_URL.to_string());

        let limits = SizeLimits {
            download_limit: env_u64("DOWNLOAD_LIMIT").unwrap_or(DEFAULT_DOWNLOAD_LIMIT),
            upload_limit: env_u64("UPLOAD_LIMIT").unwrap_or(DEFAULT_UPLOAD_LIMIT),
        };
        if limits.download_limit >= limits.upload_limit {
            return Err(Error::Config(format!(
                "DOWNLOAD_LIMIT ({}) must be smaller than UPLOAD_LIMIT ({})",
                limits.download_limit, limits.upload_limit
            )));
        }

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS").unwrap_or(30));
        let download_timeout =
            Duration::from_secs(env_u64("DOWNLOAD_TIMEOUT_SECS").unwrap_or(300));

        let stats_file =
            PathBuf::from(env_str("STATS_FILE").unwrap_or("/tmp/xgrab-stats.json".to_string()));
        let temp_dir = PathBuf::from(env_str("TEMP_DIR").unwrap_or("/tmp/xgrab".to_string()));
        fs::create_dir_all(&temp_dir)?;

        let health_addr = match env_str("HEALTH_ADDR").and_then(non_empty) {
            Some(s) => Some(
                s.parse::<SocketAddr>()
                    .map_err(|e| Error::Config(format!("invalid HEALTH_ADDR {s:?}: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            bot_token,
            vx_api_base_url,
            limits,
            http_timeout,
            download_timeout,
            stats_file,
            temp_dir,
            health_addr,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
