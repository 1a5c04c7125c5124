//! Utility functions for string and date formatting.

pub mod format;

pub use format::{format_date, truncate_string};
