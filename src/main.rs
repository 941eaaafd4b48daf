mod app;
mod config;
mod logging;
mod tray;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::*;
use crate::tray::{TitleIndicator, TrayNotifier};
use crate::ui::theme::Attr;
use anyhow::Result;
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    if let Err(e) = logging::init(&cfg.logging) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg).await;

    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn spawn_ticker(tx: mpsc::UnboundedSender<AppEvent>, period: Duration, make: fn() -> AppEvent) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if tx.send(make()).is_err() {
                break;
            }
        }
    });
}

fn start_tray(cfg: &config::AppConfig) -> Option<TrayNotifier<TitleIndicator>> {
    if !cfg.tray.enabled {
        return None;
    }
    let user_dir = cfg
        .tray
        .icons_dir
        .clone()
        .unwrap_or_else(tray::user_icons_dir);
    let icons = tray::resolve_icons(tray::INSTALL_ICONS_DIR.map(Path::new), &user_dir);
    Some(TrayNotifier::start(TitleIndicator::new("talkpad"), &icons))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let size = terminal.size()?;
    let mut state = AppState::new(cfg.clone(), size.width, size.height);
    let mut tray = start_tray(&cfg);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    spawn_ticker(event_tx.clone(), Duration::from_secs(1), || AppEvent::Tick);
    if tray.is_some() {
        spawn_ticker(
            event_tx.clone(),
            Duration::from_millis(cfg.tray.interval_ms.max(100)),
            || AppEvent::TrayTick,
        );
    }

    state.print_to(CONSOLE, '-', Attr::Text, "Welcome to talkpad.");
    state.print_to(CONSOLE, '-', Attr::Text, "Type /help for commands.");

    terminal.draw(|f| ui::render(f, &state))?;

    while let Some(event) = event_rx.recv().await {
        for action in handler::handle_event(&mut state, event) {
            match action {
                Action::Quit => state.should_quit = true,
                Action::Bell => {
                    let _ = io::stdout().write_all(b"\x07");
                    let _ = io::stdout().flush();
                }
                Action::PollTray => {
                    if let Some(ref mut tray) = tray {
                        tray.tick(&state);
                    }
                }
            }
        }

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    if let Some(ref mut tray) = tray {
        tray.shutdown();
    }
    state.close_all();
    tracing::info!("shutdown complete");
    Ok(())
}
