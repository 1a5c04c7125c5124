//! Local cache of feed data.
//!
//! This module provides the `FeedCache` for storing feed pages and
//! recommendations as JSON. Entries are revalidated after a minute; a stale
//! entry is still served when the backend can't be reached.

pub mod manager;

pub use manager::{CachedData, FeedCache};
