use serde::{Deserialize, Serialize};

use crate::utils::{format_date, truncate_string};

/// Maximum characters of description shown on a feed card
const EXCERPT_LENGTH: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
    pub uploader: Uploader,
    #[serde(rename = "uploadDate")]
    pub upload_date: String,
}

impl Video {
    /// Upload date as "17 October 2026", or the raw value if it doesn't parse
    pub fn upload_date_display(&self) -> String {
        format_date(&self.upload_date)
    }

    /// Single-line description preview for list rows
    pub fn description_excerpt(&self) -> Option<String> {
        let collapsed = self.description.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            None
        } else {
            Some(truncate_string(&collapsed, EXCERPT_LENGTH))
        }
    }
}

/// Response body of `GET /api/videos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideosResponse {
    pub videos: Vec<Video>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(rename = "totalPages")]
    pub total_pages: Option<u32>,
    #[serde(rename = "totalVideos")]
    pub total_videos: Option<u64>,
}

impl VideosResponse {
    /// Total page count, treating a missing or zero value as a single page
    pub fn page_count(&self) -> u32 {
        self.total_pages.filter(|n| *n > 0).unwrap_or(1)
    }
}
