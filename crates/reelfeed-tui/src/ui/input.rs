//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Form submissions only queue work; the main
//! loop runs it after the next frame.

use crossterm::event::{KeyCode, KeyEvent};

use reelfeed_core::routes::Route;

use crate::app::{
    max_len_login, max_len_signup, max_len_upload, push_limited, App, AppState, FeedFocus,
    LoginField, SignupField, UploadField,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Parked on a gated route while the session resolves
    if app.is_waiting_for_session() {
        match key.code {
            KeyCode::Esc => app.go_home(),
            KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
            _ => {}
        }
        return false;
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Signup => handle_signup_input(app, key),
        Route::Upload => handle_upload_input(app, key),
        Route::Home(_) if pages_focused(app) => handle_page_bar_input(app, key),
        Route::Home(_) | Route::Video { .. } => handle_browse_input(app, key),
    }
    false
}

fn pages_focused(app: &App) -> bool {
    app.feed.focus == FeedFocus::Pages && !app.page_links().is_empty()
}

/// Pagination bar on the feed: arrows move between page links
fn handle_page_bar_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.move_page_cursor(false),
        KeyCode::Right => app.move_page_cursor(true),
        KeyCode::Enter => app.open_page_cursor(),
        KeyCode::Home => app.first_page(),
        KeyCode::End => app.last_page(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => app.toggle_feed_focus(),
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        _ => {}
    }
}

/// Feed and video screens
fn handle_browse_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Esc => {
            if matches!(app.route, Route::Video { .. }) {
                app.go_home();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Left if matches!(app.route, Route::Home(_)) => app.previous_page(),
        KeyCode::Right if matches!(app.route, Route::Home(_)) => app.next_page(),
        KeyCode::Home if matches!(app.route, Route::Home(_)) => app.first_page(),
        KeyCode::End if matches!(app.route, Route::Home(_)) => app.last_page(),
        KeyCode::Tab | KeyCode::BackTab if matches!(app.route, Route::Home(_)) => {
            app.toggle_feed_focus()
        }
        KeyCode::Char('u') => app.navigate(Route::Upload),
        KeyCode::Char('o') if app.is_authenticated() => app.logout(),
        KeyCode::Char('l') if !app.is_authenticated() => app.navigate(Route::Login),
        KeyCode::Char('s') if !app.is_authenticated() => app.navigate(Route::Signup),
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    let form = &mut app.login;
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Down | KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::Up | KeyCode::BackTab => form.focus = form.focus.prev(),
        KeyCode::Enter => match form.focus {
            LoginField::Button => app.submit_login(),
            field => form.focus = field.next(),
        },
        KeyCode::Backspace => match form.focus {
            LoginField::Email => {
                form.email.pop();
            }
            LoginField::Password => {
                form.password.pop();
            }
            LoginField::Button => {}
        },
        KeyCode::Char(c) => {
            let max = max_len_login(form.focus);
            match form.focus {
                LoginField::Email => push_limited(&mut form.email, c, max),
                LoginField::Password => push_limited(&mut form.password, c, max),
                LoginField::Button => {}
            }
        }
        _ => {}
    }
}

fn handle_signup_input(app: &mut App, key: KeyEvent) {
    let form = &mut app.signup;
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Down | KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::Up | KeyCode::BackTab => form.focus = form.focus.prev(),
        KeyCode::Enter => match form.focus {
            SignupField::Button => app.submit_signup(),
            field => form.focus = field.next(),
        },
        KeyCode::Backspace => {
            let field = match form.focus {
                SignupField::Name => &mut form.name,
                SignupField::Email => &mut form.email,
                SignupField::Password => &mut form.password,
                SignupField::Button => return,
            };
            field.pop();
        }
        KeyCode::Char(c) => {
            let max = max_len_signup(form.focus);
            let field = match form.focus {
                SignupField::Name => &mut form.name,
                SignupField::Email => &mut form.email,
                SignupField::Password => &mut form.password,
                SignupField::Button => return,
            };
            push_limited(field, c, max);
        }
        _ => {}
    }
}

fn handle_upload_input(app: &mut App, key: KeyEvent) {
    if app.upload.loading {
        return;
    }

    let upload = &mut app.upload;
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Down | KeyCode::Tab => upload.focus = upload.focus.next(),
        KeyCode::Up | KeyCode::BackTab => upload.focus = upload.focus.prev(),
        KeyCode::Enter => match upload.focus {
            UploadField::Button => app.submit_upload(),
            field => upload.focus = field.next(),
        },
        KeyCode::Backspace => {
            let field = match upload.focus {
                UploadField::File => &mut upload.file_input,
                UploadField::Title => &mut upload.form.title,
                UploadField::Description => &mut upload.form.description,
                UploadField::Button => return,
            };
            field.pop();
        }
        KeyCode::Char(c) => {
            let max = max_len_upload(upload.focus);
            let field = match upload.focus {
                UploadField::File => &mut upload.file_input,
                UploadField::Title => &mut upload.form.title,
                UploadField::Description => &mut upload.form.description,
                UploadField::Button => return,
            };
            push_limited(field, c, max);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crossterm::event::KeyModifiers;
    use reelfeed_core::auth::MemoryTokenStore;
    use reelfeed_core::browse::FeedPage;
    use reelfeed_core::models::{Uploader, Video, VideosResponse};
    use reelfeed_core::routes::FeedQuery;
    use reelfeed_core::config::Config;
    use reelfeed_core::ApiClient;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn anonymous_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client");
        let mut app = App::with_parts(Config::default(), api, None, Box::new(MemoryTokenStore::new()));
        app.run_pending().await;
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_quit_needs_confirmation() {
        let mut app = anonymous_app().await;

        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_upload_key_redirects_anonymous_user() {
        let mut app = anonymous_app().await;
        handle_input(&mut app, key(KeyCode::Char('u')));
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_login_form_typing_and_focus() {
        let mut app = anonymous_app().await;
        handle_input(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login.focus, LoginField::Email);

        type_text(&mut app, "asha@example.com");
        handle_input(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "pw");
        handle_input(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.login.email, "asha@example.com");
        assert_eq!(app.login.password, "p");
        assert_eq!(app.login.focus, LoginField::Password);

        // 'q' is text inside a form, not a quit request
        type_text(&mut app, "q");
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.login.password, "pq");

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.login.focus, LoginField::Button);
        handle_input(&mut app, key(KeyCode::Enter));
        assert!(app.login.submitting);
        assert!(app.has_pending());
    }

    #[tokio::test]
    async fn test_signup_fields_cycle_backwards() {
        let mut app = anonymous_app().await;
        handle_input(&mut app, key(KeyCode::Char('s')));
        assert_eq!(app.route, Route::Signup);

        handle_input(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.signup.focus, SignupField::Button);
        handle_input(&mut app, key(KeyCode::Enter));
        assert!(!app.signup.submitting);
        assert_eq!(
            app.notifications.latest().map(|n| n.description.as_str()),
            Some("Name, email and password are required.")
        );
    }

    #[tokio::test]
    async fn test_page_bar_keys_jump_to_linked_page() {
        let mut app = anonymous_app().await;
        let query = FeedQuery::new(1, 10);
        app.feed.query = query;
        app.feed.page_cursor = 1;
        app.feed.page = Some(FeedPage {
            query,
            response: VideosResponse {
                videos: vec![Video {
                    id: "v1".to_string(),
                    title: "video number 1".to_string(),
                    description: String::new(),
                    video_url: String::new(),
                    uploader: Uploader {
                        id: "u1".to_string(),
                        name: "asha".to_string(),
                    },
                    upload_date: "2026-10-17".to_string(),
                }],
                total_pages: Some(10),
                ..Default::default()
            },
            cached_age: None,
            stale: false,
        });

        handle_input(&mut app, key(KeyCode::Tab));
        assert_eq!(app.feed.focus, FeedFocus::Pages);

        // 1 2 3 4 5 … 10: the ellipsis is skipped
        for _ in 0..5 {
            handle_input(&mut app, key(KeyCode::Right));
        }
        assert_eq!(app.feed.page_cursor, 10);
        assert_eq!(app.feed.query.page, 1);

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.route, Route::Home(FeedQuery::new(10, 10)));
    }

    #[tokio::test]
    async fn test_escape_leaves_form() {
        let mut app = anonymous_app().await;
        handle_input(&mut app, key(KeyCode::Char('l')));
        handle_input(&mut app, key(KeyCode::Esc));
        assert!(matches!(app.route, Route::Home(_)));
    }
}
