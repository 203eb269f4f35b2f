use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;
use tracing::info;

use folio_core::works::works_for;
use folio_core::{AppConfig, ChoreographySession, RenderBridge, StartPage};
use folio_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    load_theme, App, TerminalBridge,
};

pub async fn run(config: Arc<AppConfig>, start: StartPage) -> Result<()> {
    let works = works_for(&config).context("Failed to load portfolio works")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Folio"))?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    // Load theme from config
    let theme = load_theme(&config.ui.theme);
    let mut bridge = TerminalBridge::new(terminal, theme, config.ui.show_particles);

    let result = pump(&config, works, start, &mut bridge).await;

    // Restore terminal even when the pump failed
    disable_raw_mode()?;
    execute!(
        bridge.terminal_mut().backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    bridge.terminal_mut().show_cursor()?;

    result
}

/// Frame pump: drain input, tick once, present once.
async fn pump(
    config: &Arc<AppConfig>,
    works: Vec<folio_core::PortfolioWork>,
    start: StartPage,
    bridge: &mut TerminalBridge<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let session = ChoreographySession::create(config, works, start, 0.0);
    let mut app = App::new(config.clone(), session);

    let viewport = bridge.viewport()?;
    app.session.resize(viewport);

    let events = EventHandler::default();
    let fps = config.ui.fps.max(1);
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        for event in events.drain()? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.apply_action(action);
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                AppEvent::Resize(cols, rows) => {
                    app.resize(cols, rows);
                    bridge.resize(app.session.viewport())?;
                }
            }
        }

        if app.should_quit {
            break;
        }

        app.tick();
        bridge.set_overlay(app.overlay());
        bridge.present(&app.session.snapshot())?;
    }

    let summary = app.session.dispose();
    info!("Session {} ended after {} frames", summary.id, summary.frames);
    Ok(())
}
