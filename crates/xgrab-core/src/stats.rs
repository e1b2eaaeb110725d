use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Process-wide delivered-media counter, persisted to a small JSON file.
///
/// This is the only state shared across messages; increments go through one
/// atomic. Persistence is best-effort: a failed save is logged and the
/// in-memory count stays authoritative for the process lifetime.
pub struct StatsStore {
    media_downloaded: AtomicU64,
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsFile {
    media_downloaded: u64,
}

impl StatsStore {
    /// Load persisted stats, starting from zero if the file is missing or
    /// unreadable.
    pub fn load(path: PathBuf) -> Self {
        let initial = std::fs::read_to_string(&path)
            .ok()
            .and_then(|txt| serde_json::from_str::<StatsFile>(&txt).ok())
            .map(|f| f.media_downloaded)
            .unwrap_or(0);

        Self {
            media_downloaded: AtomicU64::new(initial),
            path,
        }
    }

    pub fn media_downloaded(&self) -> u64 {
        self.media_downloaded.load(Ordering::Relaxed)
    }

    /// Record `n` delivered media items and persist the new total.
    pub fn add_media_downloaded(&self, n: u64) -> u64 {
        let total = self.media_downloaded.fetch_add(n, Ordering::Relaxed) + n;
        self.save(total);
        total
    }

    fn save(&self, total: u64) {
        let file = StatsFile {
            media_downloaded: total,
        };
        let json = match serde_json::to_string(&file) {
            Ok(j) => j,
            Err(e) => {
                warn!("stats serialization failed: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("stats save to {} failed: {e}", self.path.display());
        }
    }
}
