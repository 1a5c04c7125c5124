//! Application state management for reelfeed.
//!
//! This module contains the core `App` struct that owns the session, the
//! current route, per-screen state and the background load channel.
//! Network work triggered by a key press runs after the next frame is drawn,
//! so the screen always shows a loading state first.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use reelfeed_core::api::{user_message, ApiClient, ApiError};
use reelfeed_core::auth::{SessionManager, TokenStore};
use reelfeed_core::browse::{self, FeedPage, VideoLookup};
use reelfeed_core::cache::FeedCache;
use reelfeed_core::config::Config;
use reelfeed_core::models::Video;
use reelfeed_core::pagination::PageItem;
use reelfeed_core::routes::{guard, FeedQuery, GuardDecision, Route};
use reelfeed_core::upload::{UploadForm, ValidUpload};

use crate::notifications::Notifications;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

const MAX_NAME_LENGTH: usize = 64;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_TITLE_LENGTH: usize = 120;
const MAX_DESCRIPTION_LENGTH: usize = 2000;
const MAX_PATH_LENGTH: usize = 1024;

pub type Session = SessionManager<Box<dyn TokenStore>, ApiClient>;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ConfirmingQuit,
    Quitting,
}

/// Work deferred until after the next frame
#[derive(Debug, Clone)]
enum PendingAction {
    ResolveSession,
    Login,
    Signup,
    Upload(ValidUpload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Button,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Button,
            LoginField::Button => LoginField::Email,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            LoginField::Email => LoginField::Button,
            LoginField::Password => LoginField::Email,
            LoginField::Button => LoginField::Password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Name,
    Email,
    Password,
    Button,
}

impl SignupField {
    pub fn next(self) -> Self {
        match self {
            SignupField::Name => SignupField::Email,
            SignupField::Email => SignupField::Password,
            SignupField::Password => SignupField::Button,
            SignupField::Button => SignupField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SignupField::Name => SignupField::Button,
            SignupField::Email => SignupField::Name,
            SignupField::Password => SignupField::Email,
            SignupField::Button => SignupField::Password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    File,
    Title,
    Description,
    Button,
}

impl UploadField {
    pub fn next(self) -> Self {
        match self {
            UploadField::File => UploadField::Title,
            UploadField::Title => UploadField::Description,
            UploadField::Description => UploadField::Button,
            UploadField::Button => UploadField::File,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            UploadField::File => UploadField::Button,
            UploadField::Title => UploadField::File,
            UploadField::Description => UploadField::Title,
            UploadField::Button => UploadField::Description,
        }
    }
}

#[derive(Debug)]
pub struct LoginFormState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub submitting: bool,
}

#[derive(Debug)]
pub struct SignupFormState {
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: SignupField,
    pub submitting: bool,
}

impl Default for SignupFormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            focus: SignupField::Name,
            submitting: false,
        }
    }
}

#[derive(Debug)]
pub struct UploadState {
    pub form: UploadForm,
    /// Path as typed; copied into the form on submit
    pub file_input: String,
    pub focus: UploadField,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            form: UploadForm::default(),
            file_input: String::new(),
            focus: UploadField::File,
            loading: false,
            error: None,
        }
    }
}

/// Which part of the feed screen takes the arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFocus {
    List,
    Pages,
}

#[derive(Debug)]
pub struct FeedState {
    pub query: FeedQuery,
    pub page: Option<FeedPage>,
    pub loading: bool,
    pub error: Option<String>,
    pub selection: usize,
    pub focus: FeedFocus,
    /// Page link under the cursor while the page bar has focus
    pub page_cursor: u32,
}

#[derive(Debug, Default)]
pub struct VideoState {
    pub id: String,
    pub lookup: Option<VideoLookup>,
    pub loading: bool,
    pub selection: usize,
}

impl VideoState {
    pub fn recommended(&self) -> &[Video] {
        match &self.lookup {
            Some(VideoLookup::Found(detail)) => &detail.recommended,
            _ => &[],
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned load tasks
enum LoadResult {
    Feed(FeedQuery, std::result::Result<FeedPage, String>),
    Video(String, VideoLookup),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub api: ApiClient,
    cache: Option<FeedCache>,
    pub session: Session,

    // UI State
    pub state: AppState,
    pub route: Route,
    pub feed: FeedState,
    pub video: VideoState,
    pub login: LoginFormState,
    pub signup: SignupFormState,
    pub upload: UploadState,
    pub notifications: Notifications,

    pending: Option<PendingAction>,
    persist_config: bool,

    load_tx: mpsc::Sender<LoadResult>,
    load_rx: mpsc::Receiver<LoadResult>,
}

impl App {
    /// Create the application from the loaded config
    pub fn new(config: Config, api_url: &str) -> Result<Self> {
        let api = ApiClient::new(api_url, config.request_timeout())?;
        debug!(api_url, "API client configured");

        let cache = match config.cache_dir().and_then(FeedCache::new) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "Feed cache unavailable, continuing without it");
                None
            }
        };

        let store = config.token_store()?;
        let mut app = Self::with_parts(config, api, cache, store);
        app.persist_config = true;
        Ok(app)
    }

    pub(crate) fn with_parts(
        config: Config,
        api: ApiClient,
        cache: Option<FeedCache>,
        store: Box<dyn TokenStore>,
    ) -> Self {
        let (load_tx, load_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let session = SessionManager::new(store, api.clone());
        let query = FeedQuery::new(1, config.page_size());
        let email = config.default_email().unwrap_or_default();

        Self {
            config,
            api,
            cache,
            session,
            state: AppState::Normal,
            route: Route::Home(query),
            feed: FeedState {
                query,
                page: None,
                loading: false,
                error: None,
                selection: 0,
                focus: FeedFocus::List,
                page_cursor: query.page,
            },
            video: VideoState::default(),
            login: LoginFormState {
                email,
                password: String::new(),
                focus: LoginField::Email,
                submitting: false,
            },
            signup: SignupFormState::default(),
            upload: UploadState::default(),
            notifications: Notifications::default(),
            pending: Some(PendingAction::ResolveSession),
            persist_config: false,
            load_tx,
            load_rx,
        }
    }

    // =========================================================================
    // Deferred actions
    // =========================================================================

    /// True while a submitted form or the session check is waiting to run
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the deferred action, if any. Called once per frame after drawing.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };

        match action {
            PendingAction::ResolveSession => self.resolve_session().await,
            PendingAction::Login => self.perform_login().await,
            PendingAction::Signup => self.perform_signup().await,
            PendingAction::Upload(upload) => self.perform_upload(upload).await,
        }
    }

    async fn resolve_session(&mut self) {
        self.session.initialize().await;
        self.sync_token();
        if let Some(user) = self.session.current_user() {
            info!(user_id = %user.id, "Resumed session");
        }

        // Gated routes were parked while the session was unresolved
        if self.route.requires_session() || self.route.is_auth_form() {
            let route = self.route.clone();
            self.navigate(route);
        }
    }

    /// Mirror the session token onto the API client
    fn sync_token(&mut self) {
        match self.session.token() {
            Some(token) => self.api.set_token(token.to_string()),
            None => self.api.clear_token(),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.snapshot().is_authenticated()
    }

    /// Navigate to `route`, applying the session guard
    pub fn navigate(&mut self, route: Route) {
        debug!(route = %route, "Navigate");
        match guard(&route, &self.session.snapshot()) {
            GuardDecision::Allow => self.enter(route),
            GuardDecision::Wait => {
                // Rendered as a placeholder until the session resolves
                self.route = route;
            }
            GuardDecision::Redirect(target) => {
                if route.requires_session() {
                    self.notifications
                        .error("Authentication Required", "Please log in to upload videos.");
                }
                debug!(from = %route, to = %target, "Redirected by session guard");
                self.enter(target);
            }
        }
    }

    fn enter(&mut self, route: Route) {
        match &route {
            Route::Home(query) => self.load_feed(*query),
            Route::Video { id } => self.load_video(id.clone()),
            Route::Login => {
                self.login.focus = if self.login.email.is_empty() {
                    LoginField::Email
                } else {
                    LoginField::Password
                };
            }
            Route::Signup | Route::Upload => {}
        }
        self.route = route;
    }

    /// Enter the first route once the terminal is up
    pub fn start(&mut self, route: Route) {
        info!(route = %route, "Starting");
        self.navigate(route);
    }

    /// Back to the feed page last shown
    pub fn go_home(&mut self) {
        self.navigate(Route::Home(self.feed.query));
    }

    /// Whether the current route is waiting on the session
    pub fn is_waiting_for_session(&self) -> bool {
        guard(&self.route, &self.session.snapshot()) == GuardDecision::Wait
    }

    // =========================================================================
    // Feed
    // =========================================================================

    fn load_feed(&mut self, query: FeedQuery) {
        if self.feed.query != query {
            self.feed.selection = 0;
        }
        self.feed.query = query;
        self.feed.page_cursor = query.page;
        self.feed.loading = true;
        self.feed.error = None;

        let api = self.api.clone();
        let cache = self.cache.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = browse::load_feed(&api, cache.as_ref(), query)
                .await
                .map_err(|e| {
                    error!(error = %e, page = query.page, "Failed to load feed");
                    user_message(&e)
                });
            let _ = tx.send(LoadResult::Feed(query, result)).await;
        });
    }

    pub fn next_page(&mut self) {
        let target = self
            .feed
            .page
            .as_ref()
            .filter(|page| page.shows_pagination())
            .and_then(|page| page.window().next());
        if let Some(page) = target {
            self.navigate(Route::Home(self.feed.query.with_page(page)));
        }
    }

    /// Previous stays usable on an empty page so the user can step back
    pub fn previous_page(&mut self) {
        if self.feed.query.page > 1 {
            let page = self.feed.query.page - 1;
            self.navigate(Route::Home(self.feed.query.with_page(page)));
        }
    }

    /// Jump to any page the pagination bar links to
    pub fn go_to_page(&mut self, page: u32) {
        let Some(total) = self
            .feed
            .page
            .as_ref()
            .filter(|page| page.shows_pagination())
            .map(|page| page.window().total_pages)
        else {
            return;
        };
        if (1..=total).contains(&page) && page != self.feed.query.page {
            self.navigate(Route::Home(self.feed.query.with_page(page)));
        }
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        if let Some(total) = self.feed.page.as_ref().map(|page| page.window().total_pages) {
            self.go_to_page(total);
        }
    }

    /// Page numbers linked from the pagination bar, in display order
    pub fn page_links(&self) -> Vec<u32> {
        self.feed
            .page
            .as_ref()
            .filter(|page| page.shows_pagination())
            .map(|page| {
                page.window()
                    .items()
                    .into_iter()
                    .filter_map(|item| match item {
                        PageItem::Page { number, .. } => Some(number),
                        PageItem::Ellipsis => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tab on the feed: move between the video list and the page bar
    pub fn toggle_feed_focus(&mut self) {
        self.feed.focus = match self.feed.focus {
            FeedFocus::List if !self.page_links().is_empty() => {
                self.feed.page_cursor = self.feed.query.page;
                FeedFocus::Pages
            }
            _ => FeedFocus::List,
        };
    }

    /// Step the page cursor to the neighbouring link
    pub fn move_page_cursor(&mut self, forward: bool) {
        let links = self.page_links();
        let Some(pos) = links.iter().position(|&n| n == self.feed.page_cursor) else {
            if let Some(&first) = links.first() {
                self.feed.page_cursor = first;
            }
            return;
        };
        let target = if forward {
            links.get(pos + 1)
        } else {
            pos.checked_sub(1).and_then(|i| links.get(i))
        };
        if let Some(&page) = target {
            self.feed.page_cursor = page;
        }
    }

    /// Follow the link under the page cursor
    pub fn open_page_cursor(&mut self) {
        let page = self.feed.page_cursor;
        self.go_to_page(page);
    }

    pub fn feed_videos(&self) -> &[Video] {
        self.feed.page.as_ref().map(FeedPage::videos).unwrap_or(&[])
    }

    pub fn select_next(&mut self) {
        let len = match self.route {
            Route::Home(_) => self.feed_videos().len(),
            Route::Video { .. } => self.video.recommended().len(),
            _ => return,
        };
        let selection = match self.route {
            Route::Video { .. } => &mut self.video.selection,
            _ => &mut self.feed.selection,
        };
        if *selection + 1 < len {
            *selection += 1;
        }
    }

    pub fn select_previous(&mut self) {
        let selection = match self.route {
            Route::Home(_) => &mut self.feed.selection,
            Route::Video { .. } => &mut self.video.selection,
            _ => return,
        };
        *selection = selection.saturating_sub(1);
    }

    /// Open the highlighted feed video or recommendation
    pub fn open_selected(&mut self) {
        let id = match self.route {
            Route::Home(_) => self.feed_videos().get(self.feed.selection),
            Route::Video { .. } => self.video.recommended().get(self.video.selection),
            _ => None,
        }
        .map(|video| video.id.clone());

        if let Some(id) = id {
            self.navigate(Route::Video { id });
        }
    }

    // =========================================================================
    // Video detail
    // =========================================================================

    fn load_video(&mut self, id: String) {
        self.video = VideoState {
            id: id.clone(),
            lookup: None,
            loading: true,
            selection: 0,
        };

        let api = self.api.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let lookup = browse::load_video_detail(&api, &id).await;
            let _ = tx.send(LoadResult::Video(id, lookup)).await;
        });
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Apply finished loads and expire old toasts
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.process_load_result(result);
        }
        self.notifications.prune();
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Feed(query, result) => {
                if query != self.feed.query {
                    debug!(page = query.page, "Discarding superseded feed page");
                    return;
                }
                self.feed.loading = false;
                match result {
                    Ok(page) => {
                        if page.stale {
                            self.notifications.error(
                                "Offline",
                                format!(
                                    "Showing videos cached {}.",
                                    page.cached_age.as_deref().unwrap_or("earlier")
                                ),
                            );
                        }
                        let last = page.videos().len().saturating_sub(1);
                        self.feed.selection = self.feed.selection.min(last);
                        self.feed.page = Some(page);
                    }
                    Err(message) => {
                        self.feed.page = None;
                        self.feed.error = Some(message);
                    }
                }
            }
            LoadResult::Video(id, lookup) => {
                if id != self.video.id {
                    debug!(id = %id, "Discarding superseded video lookup");
                    return;
                }
                self.video.loading = false;
                self.video.lookup = Some(lookup);
            }
        }
    }

    // =========================================================================
    // Auth forms
    // =========================================================================

    pub fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        if self.login.email.trim().is_empty() || self.login.password.is_empty() {
            self.notifications
                .error("Login Failed", "Email and password are required.");
            return;
        }
        self.login.submitting = true;
        self.pending = Some(PendingAction::Login);
    }

    async fn perform_login(&mut self) {
        let email = self.login.email.trim().to_string();
        let result = self.api.login(&email, &self.login.password).await;
        self.login.submitting = false;

        match result {
            Ok(auth) => {
                let name = auth.user.name.clone();
                if let Err(e) = self.session.login(auth.token, auth.user) {
                    error!(error = %e, "Failed to record login");
                    self.notifications.error("Login Failed", e.to_string());
                    return;
                }
                self.sync_token();
                self.login.password.clear();
                self.remember_email(email);
                info!("Login successful");
                self.notifications
                    .success("Login Successful!", format!("Welcome back, {}.", name));
                self.go_home();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.notifications.error("Login Failed", user_message(&e));
            }
        }
    }

    pub fn submit_signup(&mut self) {
        if self.signup.submitting {
            return;
        }
        let form = &self.signup;
        if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
            self.notifications
                .error("Signup Failed", "Name, email and password are required.");
            return;
        }
        self.signup.submitting = true;
        self.pending = Some(PendingAction::Signup);
    }

    async fn perform_signup(&mut self) {
        let name = self.signup.name.trim().to_string();
        let email = self.signup.email.trim().to_string();
        let result = self.api.signup(&name, &email, &self.signup.password).await;
        self.signup.submitting = false;

        match result {
            Ok(auth) => {
                let name = auth.user.name.clone();
                if let Err(e) = self.session.login(auth.token, auth.user) {
                    error!(error = %e, "Failed to record signup");
                    self.notifications.error("Signup Failed", e.to_string());
                    return;
                }
                self.sync_token();
                self.signup = SignupFormState::default();
                self.login.email = email.clone();
                self.remember_email(email);
                info!("Signup successful");
                self.notifications
                    .success("Signup Successful!", format!("Welcome, {}.", name));
                self.go_home();
            }
            Err(e) => {
                error!(error = %e, "Signup failed");
                self.notifications.error("Signup Failed", user_message(&e));
            }
        }
    }

    fn remember_email(&mut self, email: String) {
        self.config.last_email = Some(email);
        if self.persist_config {
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.sync_token();
        self.notifications.success("Logged Out", "You have been logged out.");
        self.navigate(Route::Login);
    }

    /// A rejected token means the session is gone; send the user to log in
    fn expire_session(&mut self) {
        warn!("Backend rejected the session token");
        self.session.logout();
        self.sync_token();
        self.notifications
            .error("Authentication Required", "Your session has expired. Please log in again.");
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Validate locally and queue the upload. Invalid forms never reach the backend.
    pub fn submit_upload(&mut self) {
        if self.upload.loading {
            return;
        }
        self.upload.form.select_file(&self.upload.file_input);

        match self.upload.form.validate() {
            Ok(upload) => {
                self.upload.error = None;
                self.upload.loading = true;
                self.pending = Some(PendingAction::Upload(upload));
            }
            Err(e) => {
                debug!(error = %e, "Upload form rejected");
                self.upload.error = Some(e.to_string());
                self.notifications.error("Validation Error", e.to_string());
            }
        }
    }

    async fn perform_upload(&mut self, upload: ValidUpload) {
        let result = self.api.upload_video(&upload).await;
        self.upload.loading = false;

        match result {
            Ok(video) => {
                info!(video_id = %video.id, "Upload complete");
                self.notifications.success(
                    "Upload Successful!",
                    format!("Video \"{}\" uploaded.", video.title),
                );
                self.upload.form.reset();
                self.upload.file_input.clear();
                self.upload.focus = UploadField::File;
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.invalidate() {
                        warn!(error = %e, "Failed to invalidate feed cache");
                    }
                }
                self.navigate(Route::Home(FeedQuery::new(1, self.config.page_size())));
            }
            Err(e) if e.downcast_ref::<ApiError>().map(ApiError::is_auth).unwrap_or(false) => {
                self.expire_session();
            }
            Err(e) => {
                error!(error = %e, "Upload failed");
                let message = user_message(&e);
                self.upload.error = Some(message.clone());
                self.notifications.error("Upload Failed", message);
            }
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Append `c` to `field` if it is printable and the field has room
pub fn push_limited(field: &mut String, c: char, max_chars: usize) {
    if is_valid_input_char(c) && field.chars().count() < max_chars {
        field.push(c);
    }
}

pub fn max_len_login(field: LoginField) -> usize {
    match field {
        LoginField::Email => MAX_EMAIL_LENGTH,
        LoginField::Password | LoginField::Button => MAX_PASSWORD_LENGTH,
    }
}

pub fn max_len_signup(field: SignupField) -> usize {
    match field {
        SignupField::Name => MAX_NAME_LENGTH,
        SignupField::Email => MAX_EMAIL_LENGTH,
        SignupField::Password | SignupField::Button => MAX_PASSWORD_LENGTH,
    }
}

pub fn max_len_upload(field: UploadField) -> usize {
    match field {
        UploadField::File => MAX_PATH_LENGTH,
        UploadField::Title => MAX_TITLE_LENGTH,
        UploadField::Description | UploadField::Button => MAX_DESCRIPTION_LENGTH,
    }
}

// ============================================================================
// Tests
// ============================================================================
