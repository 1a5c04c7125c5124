//! Feed and video-detail loading.
//!
//! These functions sit between the screens and the API client: they consult
//! the feed cache, classify failures into view states, and shape the
//! recommendation list shown beside a video.

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::{is_not_found, user_message, ApiClient};
use crate::cache::FeedCache;
use crate::models::{Video, VideosResponse};
use crate::pagination::PageWindow;
use crate::routes::FeedQuery;

/// Recommendations shown next to a video
pub const MAX_RECOMMENDATIONS: usize = 5;

const EMPTY_FIRST_PAGE: &str = "No videos found. Be the first to upload!";
const EMPTY_LATER_PAGE: &str =
    "No videos found on this page. Try going back to the previous page.";

/// One loaded feed page
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub query: FeedQuery,
    pub response: VideosResponse,
    /// Age of the cache entry this page was served from, if it was
    pub cached_age: Option<String>,
    /// Served from an expired cache entry because the backend failed
    pub stale: bool,
}

impl FeedPage {
    fn fetched(query: FeedQuery, response: VideosResponse) -> Self {
        Self {
            query,
            response,
            cached_age: None,
            stale: false,
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.response.videos
    }

    pub fn is_empty(&self) -> bool {
        self.response.videos.is_empty()
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.query.page, self.response.page_count())
    }

    /// Pagination controls are drawn only under a non-empty page
    pub fn shows_pagination(&self) -> bool {
        !self.is_empty()
    }

    pub fn empty_message(&self) -> &'static str {
        empty_message(self.query.page)
    }
}

/// Placeholder text for a page with no videos
pub fn empty_message(page: u32) -> &'static str {
    if page <= 1 {
        EMPTY_FIRST_PAGE
    } else {
        EMPTY_LATER_PAGE
    }
}

/// Load a feed page, preferring a fresh cache entry.
///
/// A failed fetch falls back to an expired entry when there is one.
pub async fn load_feed(
    api: &ApiClient,
    cache: Option<&FeedCache>,
    query: FeedQuery,
) -> Result<FeedPage> {
    let cached = match cache.map(|c| c.load_page(query)).transpose() {
        Ok(entry) => entry.flatten(),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable feed cache entry");
            None
        }
    };

    if let Some(entry) = cached.as_ref().filter(|entry| !entry.is_stale()) {
        debug!(page = query.page, age = entry.age_seconds(), "Feed page served from cache");
        return Ok(FeedPage {
            query,
            response: entry.data.clone(),
            cached_age: Some(entry.age_display()),
            stale: false,
        });
    }

    match api.fetch_videos(Some(query.page), Some(query.limit)).await {
        Ok(response) => {
            if let Some(cache) = cache {
                if let Err(e) = cache.save_page(query, &response) {
                    warn!(error = %e, "Failed to cache feed page");
                }
            }
            Ok(FeedPage::fetched(query, response))
        }
        Err(e) => match cached {
            Some(entry) => {
                warn!(error = %e, page = query.page, "Feed fetch failed, showing cached page");
                Ok(FeedPage {
                    query,
                    cached_age: Some(entry.age_display()),
                    response: entry.data,
                    stale: true,
                })
            }
            None => Err(e),
        },
    }
}

/// A video with the recommendations shown beside it
#[derive(Debug, Clone)]
pub struct VideoDetail {
    pub video: Video,
    pub recommended: Vec<Video>,
    /// Set when recommendations failed to load; the video is still shown
    pub recommendations_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum VideoLookup {
    Found(Box<VideoDetail>),
    NotFound,
    Failed(String),
}

/// Drop the current video and cap the list
pub fn select_recommendations(current_id: &str, candidates: Vec<Video>) -> Vec<Video> {
    candidates
        .into_iter()
        .filter(|video| video.id != current_id)
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// Fetch a video and its recommendations concurrently
pub async fn load_video_detail(api: &ApiClient, id: &str) -> VideoLookup {
    let (video, recommended) = futures::join!(api.fetch_video(id), api.fetch_recommended());

    let video = match video {
        Ok(video) => video,
        Err(e) if is_not_found(&e) => {
            debug!(id, "Video not found");
            return VideoLookup::NotFound;
        }
        Err(e) => {
            warn!(id, error = %e, "Failed to load video");
            return VideoLookup::Failed(user_message(&e));
        }
    };

    let (recommended, recommendations_error) = match recommended {
        Ok(candidates) => (select_recommendations(&video.id, candidates), None),
        Err(e) => {
            warn!(error = %e, "Failed to load recommendations");
            (Vec::new(), Some(user_message(&e)))
        }
    };

    VideoLookup::Found(Box::new(VideoDetail {
        video,
        recommended,
        recommendations_error,
    }))
}
