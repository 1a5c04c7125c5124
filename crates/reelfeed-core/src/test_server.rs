//! In-process backend used by the HTTP tests.
//!
//! Serves the same routes and error bodies as the real video backend from a
//! fixed catalogue of `VIDEO_COUNT` videos, `v1` through `v23`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

use crate::models::{Uploader, User, Video};
use crate::upload::ValidUpload;

pub const EMAIL: &str = "asha@example.com";
pub const PASSWORD: &str = "hunter22";
pub const TOKEN: &str = "test-token";
pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const VIDEO_COUNT: usize = 23;

/// Uploads with this title are rejected with a 500
pub const FAILING_TITLE: &str = "break the transcoder";

const RECOMMENDED_COUNT: usize = 7;

#[derive(Default)]
struct ServerState {
    requests: AtomicUsize,
    fail_recommended: AtomicBool,
}

pub struct TestServer {
    pub base_url: String,
    state: Arc<ServerState>,
}

impl TestServer {
    /// Requests received so far, of any route
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Make `/api/videos/recommended` answer with a 500 from now on
    pub fn fail_recommendations(&self) {
        self.state.fail_recommended.store(true, Ordering::SeqCst);
    }
}

pub async fn spawn() -> TestServer {
    let state = Arc::new(ServerState::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/profile", get(profile))
        .route("/api/videos", get(list_videos))
        .route("/api/videos/recommended", get(recommended))
        .route("/api/videos/upload", post(upload))
        .route("/api/videos/{id}", get(video_by_id))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server stopped");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A valid upload backed by a small temporary `.mp4` file
pub fn sample_upload(title: &str) -> ValidUpload {
    let suffix: u64 = rand::thread_rng().gen();
    let dir = std::env::temp_dir().join(format!("reelfeed-sample-{:016x}", suffix));
    std::fs::create_dir_all(&dir).expect("mkdir failed");
    let path: PathBuf = dir.join("clip.mp4");
    std::fs::write(&path, b"\x00\x00\x00\x18ftypmp42isom").expect("write failed");

    ValidUpload {
        title: title.to_string(),
        description: "uploaded in a test".to_string(),
        path,
        file_name: "clip.mp4".to_string(),
    }
}

pub fn account() -> User {
    User {
        id: "u1".to_string(),
        name: "asha".to_string(),
        email: EMAIL.to_string(),
    }
}

fn catalogue_video(n: usize) -> Video {
    Video {
        id: format!("v{}", n),
        title: format!("video number {}", n),
        description: format!("Description of video {}", n),
        video_url: format!("https://cdn.example.com/v{}.mp4", n),
        uploader: Uploader {
            id: "u1".to_string(),
            name: "asha".to_string(),
        },
        upload_date: format!("2026-10-{:02}T12:00:00.000Z", (n % 28) + 1),
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        == Some(TOKEN)
}

async fn count_requests(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
}

async fn login(Json(body): Json<Credentials>) -> Response {
    if body.email == EMAIL && body.password == PASSWORD {
        Json(json!({ "token": TOKEN, "user": account() })).into_response()
    } else {
        error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn signup(Json(body): Json<Credentials>) -> Response {
    if body.email == TAKEN_EMAIL || body.email == EMAIL {
        return error_body(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let user = User {
        id: "u-new".to_string(),
        name: body.name.unwrap_or_default(),
        email: body.email,
    };
    (
        StatusCode::CREATED,
        Json(json!({ "token": TOKEN, "user": user })),
    )
        .into_response()
}

async fn profile(headers: HeaderMap) -> Response {
    if bearer_ok(&headers) {
        Json(account()).into_response()
    } else {
        error_body(StatusCode::UNAUTHORIZED, "Invalid or expired token")
    }
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<usize>,
    limit: Option<usize>,
}

async fn list_videos(Query(params): Query<PageParams>) -> Response {
    let page = params.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(10);
    let start = (page - 1) * limit;

    let videos: Vec<Video> = (1..=VIDEO_COUNT)
        .skip(start)
        .take(limit)
        .map(catalogue_video)
        .collect();

    Json(json!({
        "videos": videos,
        "page": page,
        "limit": limit,
        "totalPages": VIDEO_COUNT.div_ceil(limit),
        "totalVideos": VIDEO_COUNT,
    }))
    .into_response()
}

async fn recommended(State(state): State<Arc<ServerState>>) -> Response {
    if state.fail_recommended.load(Ordering::SeqCst) {
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Recommendation service down");
    }
    let videos: Vec<Video> = (1..=RECOMMENDED_COUNT).map(catalogue_video).collect();
    Json(videos).into_response()
}

async fn video_by_id(Path(id): Path<String>) -> Response {
    let found = id
        .strip_prefix('v')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=VIDEO_COUNT).contains(n));

    match found {
        Some(n) => Json(catalogue_video(n)).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "Video not found"),
    }
}

async fn upload(headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !bearer_ok(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }

    let mut title = None;
    let mut description = String::new();
    let mut video_bytes = 0;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default().to_string().as_str() {
            "title" => title = field.text().await.ok(),
            "description" => description = field.text().await.unwrap_or_default(),
            "video" => video_bytes = field.bytes().await.map(|b| b.len()).unwrap_or(0),
            _ => {}
        }
    }

    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Title is required" })))
            .into_response();
    };
    if video_bytes == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No video file uploaded" })))
            .into_response();
    }
    if title == FAILING_TITLE {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Transcoder offline" })),
        )
            .into_response();
    }

    let video = Video {
        id: "v-new".to_string(),
        title,
        description,
        video_url: "https://cdn.example.com/v-new.mp4".to_string(),
        uploader: Uploader {
            id: "u1".to_string(),
            name: "asha".to_string(),
        },
        upload_date: "2026-10-17T09:00:00.000Z".to_string(),
    };
    (StatusCode::CREATED, Json(video)).into_response()
}
