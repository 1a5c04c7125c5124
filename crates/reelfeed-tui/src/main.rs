//! reelfeed - a terminal client for a video-sharing service.
//!
//! Browse the public feed, watch details and recommendations, and upload
//! MP4 videos once logged in. A few non-interactive commands manage the
//! saved session from the shell.

mod app;
mod notifications;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelfeed_core::api::{user_message, ApiClient};
use reelfeed_core::config::Config;
use reelfeed_core::routes::{FeedQuery, Route};
use reelfeed_core::{SessionManager, TokenStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the terminal UI owns the screen
const LOG_FILE: &str = "reelfeed.log";

const USAGE: &str = "\
Usage: reelfeed [PATH]
       reelfeed --whoami
       reelfeed --login [EMAIL]
       reelfeed --logout

PATH opens a screen directly, e.g. /video/<id> or /?page=2.
The backend URL comes from REELFEED_API_URL or api_url in config.json.";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for the non-interactive commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file in the cache directory; the terminal belongs to the UI
fn init_tui_tracing(config: &Config) -> Option<WorkerGuard> {
    let dir = config.cache_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::load().context("Failed to load config")?;

    // Non-interactive commands
    match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--whoami") => {
            init_cli_tracing();
            return whoami(&config).await;
        }
        Some("--login") => {
            init_cli_tracing();
            return login(config, args.get(2).cloned()).await;
        }
        Some("--logout") => {
            init_cli_tracing();
            return logout(&config);
        }
        _ => {}
    }

    let start_route = match args.get(1) {
        Some(path) => Route::parse(path)
            .ok_or_else(|| anyhow::anyhow!("Unknown path: {}\n\n{}", path, USAGE))?,
        None => Route::Home(FeedQuery::new(1, config.page_size())),
    };

    let api_url = config.api_url()?;
    let _log_guard = init_tui_tracing(&config);
    info!("reelfeed starting");

    let mut app = App::new(config, &api_url)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start(start_route);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("reelfeed shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Deferred work runs only after its loading state has been drawn
        if app.has_pending() {
            app.run_pending().await;
            continue;
        }

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Apply finished background loads
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// CLI commands
// ============================================================================

fn cli_client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.api_url()?, config.request_timeout())
}

/// Print the user behind the saved token
async fn whoami(config: &Config) -> Result<()> {
    let api = cli_client(config)?;
    let mut session = SessionManager::new(config.token_store()?, api);
    session.initialize().await;

    match session.current_user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Log in from the shell, prompting for the password
async fn login(mut config: Config, email: Option<String>) -> Result<()> {
    let api = cli_client(&config)?;

    let email = match email.or_else(|| config.default_email()) {
        Some(email) => email,
        None => {
            print!("Email: ");
            io::stdout().flush()?;
            let mut email = String::new();
            io::stdin().read_line(&mut email)?;
            email.trim().to_string()
        }
    };
    let password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");
    let auth = match api.login(&email, &password).await {
        Ok(auth) => auth,
        Err(e) => anyhow::bail!("Login failed: {}", user_message(&e)),
    };

    // The new token replaces whatever was saved; no need to validate the old one
    let mut session = SessionManager::new(config.token_store()?, api);
    session.start_fresh();
    let name = auth.user.name.clone();
    session.login(auth.token, auth.user)?;

    config.last_email = Some(email);
    config.save()?;

    println!("Welcome back, {}.", name);
    Ok(())
}

fn logout(config: &Config) -> Result<()> {
    config.token_store()?.clear()?;
    println!("Logged out");
    Ok(())
}
