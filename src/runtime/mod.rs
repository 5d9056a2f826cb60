use std::sync::{Arc, mpsc};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{PlaybackResource, ResourceEvent, RodioOutput};
use crate::catalog::{Catalog, HttpCatalog};
use crate::cli::Cli;
use crate::mpris::ControlCmd;
use crate::player::{PlaybackSession, PlayerController};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (settings, settings_problem) = settings::load_settings(cli.config.clone());

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let _log_guard = logging::init(&settings.log);
    if let Some(problem) = settings_problem {
        tracing::warn!("{problem}");
    }
    tracing::info!(base_url = %settings.catalog.base_url, "starting crescendo");

    let catalog: Arc<dyn Catalog> = Arc::new(HttpCatalog::new(&settings.catalog)?);

    let session = PlaybackSession::new(
        f32::from(settings.playback.initial_volume) / 100.0,
        settings.playback.muted,
    );
    let mut output = RodioOutput::new(settings.audio.clone(), session.volume, session.muted);
    let (resource_tx, resource_rx) = mpsc::channel::<ResourceEvent>();
    output.subscribe(resource_tx);

    let mut player = PlayerController::new(catalog, output, session);
    let mut app = App::new();

    if let Some(query) = cli.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        app.last_query = Some(query.to_string());
        player.search(query);
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &mpris,
            &control_tx,
            &control_rx,
            &resource_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!("event loop failed: {e}");
    }
    tracing::info!("shutting down");

    run_result
}
