//! Offline response cache keyed by exact request URL.
//!
//! Each entry is one JSON file holding the URL it was stored under, the time
//! it was written and the verbatim response body. Lookups compare the stored
//! URL, so two URLs that sanitise to the same file name never alias.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CacheError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    stored_at: chrono::DateTime<chrono::Utc>,
    body: String,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
}

impl ResponseCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    /// A cache that never holds anything.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// The previously stored body for `url`, if any.
    pub async fn lookup(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url)?;
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) if entry.url == url => Some(entry.body),
            Ok(_) => None,
            Err(e) => {
                debug!("[cache] unreadable entry {}: {}", path.display(), e);
                None
            }
        }
    }

    pub async fn store(&self, url: &str, body: &str) -> Result<(), CacheError> {
        let Some(path) = self.entry_path(url) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entry = CacheEntry {
            url: url.to_string(),
            stored_at: chrono::Utc::now(),
            body: body.to_string(),
        };
        tokio::fs::write(&path, serde_json::to_vec(&entry)?).await?;
        Ok(())
    }

    fn entry_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        Some(dir.join(format!("{}.json", entry_file_stem(url))))
    }
}

fn entry_file_stem(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}
