//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Frame layout, navigation bar, toasts and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `screens`: Per-route content (feed, video, auth forms, upload)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
