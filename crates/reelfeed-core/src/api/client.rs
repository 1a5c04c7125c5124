//! API client for communicating with the video backend.
//!
//! This module provides the `ApiClient` struct for the auth, feed, detail
//! and upload endpoints. Authenticated calls attach the session token as a
//! bearer header.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, multipart, Client, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::ProfileSource;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User, Video, VideosResponse};
use crate::upload::ValidUpload;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Content type sent for the uploaded video part.
const UPLOAD_MIME: &str = "video/mp4";

/// Fixed routes under `/api/videos/` that shadow a video id of the same name
const RESERVED_VIDEO_SEGMENTS: [&str; 2] = ["recommended", "upload"];

/// API client for the video backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the backend at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(request.header(header::AUTHORIZATION, format!("Bearer {}", token)))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, requires_auth: bool) -> Result<T> {
        self.get_url(self.url(path), requires_auth).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: String, requires_auth: bool) -> Result<T> {
        let mut request = self.client.get(&url);
        if requires_auth {
            request = self.authorized(request)?;
        }

        debug!(url = %url, "GET");
        let response = request
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);

        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    // ===== Authentication =====

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.post("/api/auth/login", &LoginRequest { email, password })
            .await
            .context("Login request failed")
    }

    /// Create an account; the backend logs the new account in immediately
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        self.post("/api/auth/signup", &SignupRequest { name, email, password })
            .await
            .context("Signup request failed")
    }

    /// Fetch the profile behind the current token
    pub async fn fetch_profile(&self) -> Result<User> {
        self.get("/api/auth/profile", true).await
    }

    // ===== Videos =====

    /// Fetch one feed page. Omitted parameters are left to the backend's defaults.
    pub async fn fetch_videos(&self, page: Option<u32>, limit: Option<u32>) -> Result<VideosResponse> {
        let mut params = Vec::new();
        if let Some(page) = page {
            params.push(format!("page={}", page));
        }
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }

        let path = if params.is_empty() {
            "/api/videos".to_string()
        } else {
            format!("/api/videos?{}", params.join("&"))
        };

        self.get(&path, false).await
    }

    pub async fn fetch_recommended(&self) -> Result<Vec<Video>> {
        self.get("/api/videos/recommended", false).await
    }

    /// Fetch a single video. A missing video surfaces as `ApiError::NotFound`.
    pub async fn fetch_video(&self, id: &str) -> Result<Video> {
        if id.is_empty() || RESERVED_VIDEO_SEGMENTS.contains(&id) {
            debug!(id = %id, "Video id can never match a video");
            return Err(ApiError::NotFound("Video not found".to_string()).into());
        }

        self.get_url(self.video_url(id)?, false)
            .await
            .with_context(|| format!("Failed to fetch video {}", id))
    }

    /// `/api/videos/<id>` with the id percent-encoded as a single path segment
    fn video_url(&self, id: &str) -> Result<String> {
        let mut url = Url::parse(&self.url("/api/videos"))
            .with_context(|| format!("Invalid API base URL {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL {} cannot take a path", self.base_url))?
            .push(id);
        Ok(url.into())
    }

    /// Upload a validated video as multipart form data
    pub async fn upload_video(&self, upload: &ValidUpload) -> Result<Video> {
        let url = self.url("/api/videos/upload");
        let request = self.authorized(self.client.post(&url))?;

        let bytes = tokio::fs::read(&upload.path)
            .await
            .with_context(|| format!("Failed to read video file {}", upload.path.display()))?;
        debug!(url = %url, bytes = bytes.len(), file = %upload.file_name, "Uploading video");

        let video_part = multipart::Part::bytes(bytes)
            .file_name(upload.file_name.clone())
            .mime_str(UPLOAD_MIME)
            .map_err(ApiError::from)?;

        let form = multipart::Form::new()
            .part("video", video_part)
            .text("title", upload.title.clone())
            .text("description", upload.description.clone());

        let response = request
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send upload request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Upload rejected");
            return Err(ApiError::from_upload_status(status, &body).into());
        }

        Self::parse_json(response, &url).await
    }
}

impl ProfileSource for ApiClient {
    async fn fetch_profile_with(&self, token: &str) -> Result<User> {
        self.with_token(token).get("/api/auth/profile", true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{is_not_found, user_message};
    use crate::test_server;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5)).expect("Failed to build client")
    }

    #[test]
    fn test_base_url_is_normalised() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.base_url(), "http://localhost:8080");
        assert_eq!(api.url("/api/videos"), "http://localhost:8080/api/videos");
    }

    #[tokio::test]
    async fn test_login_and_profile() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let auth = api.login(test_server::EMAIL, test_server::PASSWORD).await.expect("login failed");
        assert_eq!(auth.token, test_server::TOKEN);
        assert_eq!(auth.user.email, test_server::EMAIL);

        let profile = api.with_token(&auth.token).fetch_profile().await.expect("profile failed");
        assert_eq!(profile, auth.user);
    }

    #[tokio::test]
    async fn test_login_rejection_carries_backend_message() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let err = api.login(test_server::EMAIL, "wrong").await.unwrap_err();
        assert_eq!(user_message(&err), "Invalid email or password");
        assert!(err.downcast_ref::<ApiError>().map(ApiError::is_auth).unwrap_or(false));
    }

    #[tokio::test]
    async fn test_signup_conflict() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let auth = api.signup("Meera", "meera@example.com", "pw").await.expect("signup failed");
        assert_eq!(auth.user.name, "Meera");

        let err = api.signup("Dup", test_server::TAKEN_EMAIL, "pw").await.unwrap_err();
        assert_eq!(user_message(&err), "Email already registered");
    }

    #[tokio::test]
    async fn test_profile_without_token_makes_no_request() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let err = api.fetch_profile().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::MissingToken)));
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_with_bad_token() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url).with_token("stale");

        let err = api.fetch_profile().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_fetch_videos_pages() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let first = api.fetch_videos(Some(1), Some(10)).await.expect("page 1 failed");
        assert_eq!(first.videos.len(), 10);
        assert_eq!(first.page_count(), 3);

        let last = api.fetch_videos(Some(3), Some(10)).await.expect("page 3 failed");
        assert_eq!(last.videos.len(), test_server::VIDEO_COUNT - 20);

        let defaults = api.fetch_videos(None, None).await.expect("default page failed");
        assert_eq!(defaults.videos[0].id, "v1");
    }

    #[tokio::test]
    async fn test_fetch_video_not_found() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        let video = api.fetch_video("v3").await.expect("v3 should exist");
        assert_eq!(video.title, "video number 3");

        let err = api.fetch_video("missing").await.unwrap_err();
        assert!(is_not_found(&err));
        assert_eq!(user_message(&err), "Video not found");
    }

    #[tokio::test]
    async fn test_video_id_is_one_path_segment() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);

        // Unencoded, "?" would start a query and fetch v3
        let err = api.fetch_video("v3?x=1").await.unwrap_err();
        assert!(is_not_found(&err));
        let err = api.fetch_video("v3/extra").await.unwrap_err();
        assert!(is_not_found(&err));

        let before = server.request_count();
        for id in ["recommended", "upload", ""] {
            let err = api.fetch_video(id).await.unwrap_err();
            assert!(is_not_found(&err), "id {:?}", id);
        }
        assert_eq!(server.request_count(), before);
    }

    #[tokio::test]
    async fn test_upload_requires_token() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url);
        let upload = test_server::sample_upload("clip");

        let err = api.upload_video(&upload).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::MissingToken)));
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_success_and_failure() {
        let server = test_server::spawn().await;
        let api = client(&server.base_url).with_token(test_server::TOKEN);

        let video = api
            .upload_video(&test_server::sample_upload("my first clip"))
            .await
            .expect("upload failed");
        assert_eq!(video.title, "my first clip");
        assert_eq!(video.description, "uploaded in a test");

        let err = api
            .upload_video(&test_server::sample_upload(test_server::FAILING_TITLE))
            .await
            .unwrap_err();
        assert_eq!(user_message(&err), "Transcoder offline");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Port 9 (discard) is closed on test machines
        let api = client("http://127.0.0.1:9");
        let err = api.fetch_recommended().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NetworkError(_))));
    }
}
