//! REST API client module for the video backend.
//!
//! This module provides the `ApiClient` for the auth, feed, detail and
//! upload endpoints, and the `ApiError` taxonomy used to turn failed
//! responses into messages a user can read.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{is_not_found, user_message, ApiError};
