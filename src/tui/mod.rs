//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the top screen,
//! and translates keyboard events into core::Action values. The keyboard
//! plays the role of the TV remote: arrows are the D-pad, Enter is OK and
//! Esc is Back.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (spinner visible or fading): draws every ~80ms.
//! - **Waiting** (navigation in flight, timers pending): polls every ~80ms so
//!   results coming back from the runtime show up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.

mod component;
mod components;
mod event;
pub mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use url::Url;

use crate::core::action::Action;
use crate::core::config::{CREX_VERSION, ResolvedConfig};
use crate::core::engine::{EngineSettings, NavigationEngine};
use crate::fetch::HttpFetcher;
use crate::runtime::Runtime;
use crate::templates::{TemplateOptions, default_registry};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Theme;

const ANIMATION_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Nothing to type into, the cursor only gets in the way
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (cursor hidden)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Build the engine for a resolved config with the stock templates.
pub fn build_engine(config: &ResolvedConfig) -> NavigationEngine {
    let registry = default_registry(TemplateOptions {
        client_version: CREX_VERSION,
        resolution_height: config.resolution_height,
    });
    NavigationEngine::new(registry, EngineSettings::from_config(config))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut engine = build_engine(&config);
    let theme = Theme::from_config(&config.menu_bar);

    let base_url = config.root_url.as_deref().and_then(|raw| match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Root URL {} is not absolute ({}), relative links won't resolve", raw, e);
            None
        }
    });

    // Channel for actions from background tasks
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout));
    let mut runtime = Runtime::new(fetcher, base_url, tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut should_quit = runtime.execute(engine.update(Action::Start));

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    while !should_quit {
        let animating = ui::is_animating(&engine);
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &engine, &theme, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short while anything is moving or pending
        let timeout = if animating || engine.is_busy() || runtime.in_flight() > 0 {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Quit => {
                    info!("Quit requested");
                    should_quit = true;
                    break;
                }
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}
                _ => {
                    if let Some(action) = event.action() {
                        should_quit |= runtime.execute(engine.update(action));
                    }
                }
            }
        }

        // Handle background task results (fetches, loads, timers)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if runtime.execute(engine.update(action)) {
                should_quit = true;
                break;
            }
        }
    }

    info!("Shutting down, {} task(s) in flight", runtime.in_flight());
    runtime.shutdown();
    ratatui::restore();
    Ok(())
}
