//! pulse-dash — a terminal dashboard for a news-aggregation backend.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  SyncMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ sync.rs  │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tokio)  │ (channel)  │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲                    ▲      │ Command
//!      │                    │      ▼
//!      │          ┌──────────┐  ┌────────────┐
//!      └───────── │ input.rs │  │ effects.rs │ ──► browser / clipboard
//!                 └──────────┘  └────────────┘
//! ```
//!
//! * **`source/`** — the `NewsBackend` trait, the backend's record types and
//!   the reqwest client.
//! * **`sync`** — runs backend calls as tokio tasks and reports back.
//! * **`app`** — the view model: collections, loading flag, optimistic
//!   favorites, share dispatch.
//! * **`view`** — the serializable view-state record and its transitions.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key and mouse events to `App` actions.
//! * **`effects`** — runs the `Command`s the app returns.
//! * **`main`** — wires everything together: parse args, set up logging
//!   and the terminal, and run the event loop.

mod app;
mod config;
mod effects;
mod error;
mod html;
mod input;
mod logging;
mod share;
mod source;
mod sync;
mod ui;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::App;
use config::Cli;
use effects::Effects;
use source::ApiClient;
use sync::Syncer;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode, mouse capture and alternate-screen lifetime
/// via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -- logging (guard flushes on drop) --------------------------------------
    let log_path = cli.log_path();
    let _log_guard = logging::init(&log_path, cli.debug)?;

    install_panic_hook();

    // -- backend + background runtime ----------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pulse-sync")
        .build()
        .context("starting tokio runtime")?;
    let client = ApiClient::new(&cli.api_url, cli.timeout())?;
    info!(api = client.base_url(), log = %log_path.display(), "starting pulse-dash");

    let (syncer, mut rx) = Syncer::new(Arc::new(client), runtime.handle().clone());
    let mut effects = Effects::new(syncer);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(cli.broadcast);

    // Initial load: news and topics, concurrently.
    effects.run(app.begin_refresh());

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any results from the sync tasks.
    //   2. Render the UI.
    //   3. Poll for keyboard/mouse input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process sync messages
        while let Ok(msg) = rx.try_recv() {
            if let Some(command) = app.handle_sync(msg) {
                effects.run(command);
            }
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => effects.run_all(input::handle_key_event(&mut app, key)),
                Event::Mouse(mouse) => input::handle_mouse_event(&mut app, mouse),
                _ => {}
            }
        }

        if app.quit {
            break;
        }
    }

    drop(guard);
    info!("shutting down");
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
