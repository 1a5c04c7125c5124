//! Client routes and the session route guard.
//!
//! Routes mirror the paths of the web front end: `/`, `/login`, `/signup`,
//! `/upload` and `/video/:id`, with feed pagination as `?page=&limit=` on `/`.

use std::fmt;

use crate::auth::{SessionSnapshot, SessionState};

/// Feed page shown when the query doesn't name one
pub const DEFAULT_PAGE: u32 = 1;

/// Videos per feed page when the query doesn't name a limit
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FeedQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parse a `page=2&limit=20` query string.
    /// Missing, malformed or zero values fall back to the defaults.
    pub fn from_query(query: &str) -> Self {
        let mut parsed = Self::default();
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.parse::<u32>().ok().filter(|n| *n > 0);
            match (key, value) {
                ("page", Some(page)) => parsed.page = page,
                ("limit", Some(limit)) => parsed.limit = limit,
                _ => {}
            }
        }
        parsed
    }

    /// Same limit, different page
    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.limit)
    }

    /// Query string without defaults, e.g. `page=3` or an empty string
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if self.page != DEFAULT_PAGE {
            params.push(format!("page={}", self.page));
        }
        if self.limit != DEFAULT_LIMIT {
            params.push(format!("limit={}", self.limit));
        }
        params.join("&")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home(FeedQuery),
    Login,
    Signup,
    Upload,
    Video { id: String },
}

impl Route {
    pub fn home() -> Self {
        Route::Home(FeedQuery::default())
    }

    /// Parse a client path. Unknown paths are `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path, ""),
        };
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Some(Route::Home(FeedQuery::from_query(query))),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/upload" => Some(Route::Upload),
            _ => {
                let id = trimmed.strip_prefix("/video/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::Video { id: id.to_string() })
                }
            }
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home(query) => {
                let query = query.to_query();
                if query.is_empty() {
                    "/".to_string()
                } else {
                    format!("/?{}", query)
                }
            }
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Upload => "/upload".to_string(),
            Route::Video { id } => format!("/video/{}", id),
        }
    }

    /// Screens that only make sense with a logged-in user
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Upload)
    }

    /// Screens that only make sense without a logged-in user
    pub fn is_auth_form(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Outcome of checking a route against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the route
    Allow,
    /// Session still resolving; show a placeholder and do not redirect yet
    Wait,
    Redirect(Route),
}

/// Decide whether `route` may be shown for the given session snapshot
pub fn guard(route: &Route, session: &SessionSnapshot) -> GuardDecision {
    let gated = route.requires_session() || route.is_auth_form();
    if !gated {
        return GuardDecision::Allow;
    }

    match session.state() {
        SessionState::Unresolved => GuardDecision::Wait,
        SessionState::Anonymous if route.requires_session() => GuardDecision::Redirect(Route::Login),
        SessionState::Authenticated if route.is_auth_form() => GuardDecision::Redirect(Route::home()),
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn resolved(user: Option<User>) -> SessionSnapshot {
        SessionSnapshot {
            user,
            loading: false,
        }
    }

    fn someone() -> User {
        User {
            id: "u1".to_string(),
            name: "kiran".to_string(),
            email: "kiran@example.com".to_string(),
        }
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(Route::parse("/"), Some(Route::home()));
        assert_eq!(Route::parse(""), Some(Route::home()));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/signup/"), Some(Route::Signup));
        assert_eq!(Route::parse("/upload"), Some(Route::Upload));
        assert_eq!(
            Route::parse("/video/665f1c"),
            Some(Route::Video { id: "665f1c".to_string() })
        );
        assert_eq!(Route::parse("/video/"), None);
        assert_eq!(Route::parse("/video/a/b"), None);
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn test_parse_feed_query() {
        assert_eq!(
            Route::parse("/?page=3&limit=20"),
            Some(Route::Home(FeedQuery { page: 3, limit: 20 }))
        );
        assert_eq!(Route::parse("/?page=abc"), Some(Route::home()));
        assert_eq!(Route::parse("/?page=0&limit=0"), Some(Route::home()));
        assert_eq!(
            Route::parse("/?limit=5&utm=x"),
            Some(Route::Home(FeedQuery { page: 1, limit: 5 }))
        );
    }

    #[test]
    fn test_to_path() {
        assert_eq!(Route::home().to_path(), "/");
        assert_eq!(Route::Home(FeedQuery::new(2, 10)).to_path(), "/?page=2");
        assert_eq!(Route::Home(FeedQuery::new(2, 25)).to_path(), "/?page=2&limit=25");
        assert_eq!(Route::Video { id: "x1".to_string() }.to_string(), "/video/x1");
    }

    #[test]
    fn test_with_page_keeps_limit() {
        let query = FeedQuery::new(1, 25).with_page(4);
        assert_eq!(query, FeedQuery { page: 4, limit: 25 });
    }

    #[test]
    fn test_guard_waits_while_loading() {
        let loading = SessionSnapshot::default();
        assert_eq!(guard(&Route::Upload, &loading), GuardDecision::Wait);
        assert_eq!(guard(&Route::Login, &loading), GuardDecision::Wait);
        assert_eq!(guard(&Route::home(), &loading), GuardDecision::Allow);
    }

    #[test]
    fn test_guard_anonymous() {
        let anonymous = resolved(None);
        assert_eq!(guard(&Route::Upload, &anonymous), GuardDecision::Redirect(Route::Login));
        assert_eq!(guard(&Route::Login, &anonymous), GuardDecision::Allow);
        assert_eq!(guard(&Route::Signup, &anonymous), GuardDecision::Allow);
        assert_eq!(
            guard(&Route::Video { id: "v1".to_string() }, &anonymous),
            GuardDecision::Allow
        );
    }

    #[test]
    fn test_guard_authenticated() {
        let authenticated = resolved(Some(someone()));
        assert_eq!(guard(&Route::Upload, &authenticated), GuardDecision::Allow);
        assert_eq!(guard(&Route::Login, &authenticated), GuardDecision::Redirect(Route::home()));
        assert_eq!(guard(&Route::Signup, &authenticated), GuardDecision::Redirect(Route::home()));
    }
}
