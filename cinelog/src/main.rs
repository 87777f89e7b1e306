//! cinelog — terminal client for a shared movie-rating service.
//!
//! Entry point for the `cinelog` binary. Wires together configuration
//! (`config`), file logging (`logging`), the terminal lifecycle (`tui`), the
//! unified event bus (`event`), background requests (`worker`), and the UI
//! (`ui`) around the client state in `cinelog-core`.
//!
//! # Startup sequence
//!
//! 1. Load `config.toml` and apply environment overrides. A broken config file
//!    falls back to defaults and is logged once logging is up.
//! 2. Start file logging under the data directory. Nothing may write to the
//!    terminal once the alternate screen is active.
//! 3. Restore the persisted session from SQLite.
//! 4. `install_panic_hook()`, `register_sigterm()`, `init_tui()`, then spawn
//!    the event task.
//! 5. Subscribe to session changes and load the followee set for a restored
//!    session before the first frame.
//!
//! `restore_tui()` is called after the event loop exits (`q`, SIGTERM, or
//! channel close). Inside the loop errors only propagate out of the Render arm.

mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;
mod worker;

use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use cinelog_core::api::ApiClient;
use cinelog_core::db::SqliteKvStore;
use cinelog_core::http::HttpApi;
use cinelog_core::session::SessionStore;
use tokio::time::Instant;

use crate::ui::keybindings::{handle_key, KeyAction};

/// Name of the SQLite file holding the session record.
const DB_FILE: &str = "cinelog.db";

/// Resolves when `deadline` passes; never resolves without one.
async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // Step 1: configuration.
    let (mut cfg, config_error) = match config::load(&config::config_path()) {
        Ok(cfg) => (cfg, None),
        Err(e) => (config::Config::default(), Some(e)),
    };
    cfg.apply_env(|key| std::env::var(key).ok());

    // Step 2: logging.
    let data_dir = cfg.data_dir();
    let log_path = logging::init(&data_dir)?;
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "using default configuration");
    }
    tracing::info!(
        api = %cfg.api_base_url,
        data_dir = %data_dir.display(),
        log = %log_path.display(),
        "starting cinelog"
    );

    // Step 3: session store and API client.
    let storage = SqliteKvStore::open(data_dir.join(DB_FILE)).map_err(io::Error::other)?;
    let session = SessionStore::restore_on_startup(Box::new(storage));
    let mut session_rx = session.subscribe();
    let api: Arc<dyn ApiClient> =
        Arc::new(HttpApi::new(cfg.api_base_url.clone(), cfg.request_timeout()).map_err(io::Error::other)?);

    let theme = theme::Theme::from_name(&cfg.theme);
    let mut state = app::AppState::new(session, cfg.debounce(), cfg.page_size());

    // Step 4: terminal.
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    // Step 5: a restored session needs its followees before the first frame.
    let restored = state.current_session();
    state.on_session_change(restored.as_ref());

    // Event loop: exits only via `break`, never via `?` outside the Render arm.
    'event_loop: loop {
        for job in state.take_jobs() {
            worker::spawn_job(Arc::clone(&api), job, tx.clone());
        }

        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            // A search box's debounce window closed.
            _ = until(state.next_deadline()) => {
                state.poll_queries(Instant::now());
            }
            changed = session_rx.changed() => {
                if changed.is_ok() {
                    let current = session_rx.borrow_and_update().clone();
                    tracing::info!(signed_in = current.is_some(), "session changed");
                    state.on_session_change(current.as_ref());
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, &mut state, &theme))?;
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Tick) => {
                        state.tick = state.tick.wrapping_add(1);
                    }
                    Some(event::AppEvent::Api(outcome)) => state.apply(*outcome),
                    // The next Render picks up the new size from `frame.area()`.
                    Some(event::AppEvent::Resize(_, _)) => {}
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tracing::info!("shutting down");
    tui::restore_tui()?;
    Ok(())
}
