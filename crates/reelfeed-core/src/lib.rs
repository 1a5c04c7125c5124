//! Core library for reelfeed.
//!
//! This crate holds everything that is not terminal rendering:
//!
//! - `api`: REST client for the video backend and its error taxonomy
//! - `auth`: session manager and token persistence backends
//! - `browse`: feed and video-detail loading
//! - `cache`: on-disk cache of feed pages
//! - `pagination`: page-window calculation for feed controls
//! - `routes`: client routes and the session route guard
//! - `upload`: upload form validation

pub mod api;
pub mod auth;
pub mod browse;
pub mod cache;
pub mod config;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod upload;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_server;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionManager, SessionSnapshot, SessionState, TokenStore};
pub use config::Config;
pub use models::{User, Video};
pub use pagination::PageWindow;
pub use routes::{FeedQuery, GuardDecision, Route};
