use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::VideosResponse;
use crate::routes::FeedQuery;

/// Feed pages are revalidated after a minute.
const CACHE_STALE_SECONDS: i64 = 60;

/// File name prefix shared by every feed cache entry
const FEED_PREFIX: &str = "feed_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.cached_at).num_seconds()
    }

    pub fn age_display(&self) -> String {
        let seconds = self.age_seconds();
        if seconds < 60 {
            // Includes negative ages from clock skew
            "just now".to_string()
        } else if seconds < 3600 {
            format!("{}m ago", seconds / 60)
        } else if seconds < 86_400 {
            format!("{}h ago", seconds / 3600)
        } else {
            format!("{}d ago", seconds / 86_400)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_seconds() > CACHE_STALE_SECONDS
    }
}

/// JSON files under the cache directory, one per feed page
#[derive(Debug, Clone)]
pub struct FeedCache {
    cache_dir: PathBuf,
}

impl FeedCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    fn page_key(query: FeedQuery) -> String {
        format!("{}p{}_l{}", FEED_PREFIX, query.page, query.limit)
    }

    // ===== Feed pages =====

    pub fn load_page(&self, query: FeedQuery) -> Result<Option<CachedData<VideosResponse>>> {
        self.load(&Self::page_key(query))
    }

    pub fn save_page(&self, query: FeedQuery, page: &VideosResponse) -> Result<()> {
        self.save(&Self::page_key(query), page)
    }

    /// Drop every cached feed entry, e.g. after an upload changes the feed
    pub fn invalidate(&self) -> Result<()> {
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e).context("Failed to list cache directory"),
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(FEED_PREFIX) {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        debug!(removed, "Feed cache invalidated");
        Ok(())
    }
}
