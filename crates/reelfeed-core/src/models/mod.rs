//! Data models for the video backend.
//!
//! - `User`, `AuthResponse`: account identity and login/signup payloads
//! - `Video`, `Uploader`, `VideosResponse`: read-only video projections

pub mod user;
pub mod video;

pub use user::{AuthResponse, LoginRequest, SignupRequest, User};
pub use video::{Uploader, Video, VideosResponse};
