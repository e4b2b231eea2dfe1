//! skywatch: NASA's open data feeds in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲                       ▲
//!      │ spawn_search()        │ handle_key_event()
//!      └──────────────── ┌──────────┐
//!                        │ input.rs │
//!                        └──────────┘
//! ```
//!
//! * **`source/`**: one adapter per NASA endpoint plus the `JsonClient`
//!   transport they share.
//! * **`fetch`**: runs the adapters on a tokio runtime and reports back over
//!   a channel.
//! * **`gallery`**: client-side pagination of image search results.
//! * **`app`**: owns all dashboard state (feeds, view, search, selection).
//! * **`ui`**: pure rendering, reads `App` state and draws widgets.
//! * **`input`**: maps key events to `App` mutations.
//! * **`config`** / **`logging`**: environment and log file setup.
//! * **`main`**: wires everything together and runs the event loop.

mod app;
mod config;
mod fetch;
mod gallery;
mod input;
mod logging;
mod source;
mod ui;

use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use app::App;
use config::AppConfig;
use fetch::{FetchMsg, Feeds};
use input::Action;
use source::{images::DEFAULT_QUERY, HttpJsonClient};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config.log_dir)?;
    if config.uses_demo_key() {
        warn!("NASA_API_KEY not set, falling back to the rate-limited DEMO_KEY");
    }
    info!(api = %config.nasa_api_url, images = %config.nasa_images_url, "starting");

    install_panic_hook();

    // -- fetch runtime -------------------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let client = Arc::new(HttpJsonClient::new()?);
    let feeds = Arc::new(Feeds::new(client, &config));
    let (tx, rx) = mpsc::channel();

    fetch::spawn_initial(runtime.handle(), feeds.clone(), DEFAULT_QUERY.to_string(), tx.clone());

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.uses_demo_key());

    // -- main event loop -----------------------------------------------------
    // ~10 fps: drain fetch results, render, then wait up to one tick for a key.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            match msg {
                FetchMsg::Initial(load) => app.finish_initial(load),
                FetchMsg::Search { token, result } => {
                    app.finish_search(token, result);
                }
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(Action::Search(ticket)) = input::handle_key_event(&mut app, key) {
                    fetch::spawn_search(
                        runtime.handle(),
                        feeds.clone(),
                        ticket.token,
                        ticket.query,
                        tx.clone(),
                    );
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // Superseded or unfinished requests are simply dropped with the runtime.
    runtime.shutdown_background();
    info!("exiting");
    Ok(())
}
