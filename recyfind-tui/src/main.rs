//! Terminal UI for recyfind that lists recycling centers with their distance and opening hours.

mod app;
mod input;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Arc, sync::Mutex, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use recyfind_core::{Coordinates, plugin::SourceRegistry, service::RecyclingService, state::Action};
use recyfind_provider_features as features;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Screen};
use crate::input::Command;

/// Find nearby recycling centers and check when they are open.
#[derive(Debug, Parser)]
#[command(name = "recyfind", version)]
struct Cli {
    /// Register a region backed by a feature collection file, as `ID=PATH`.
    /// Repeat for several regions.
    #[arg(long = "source", value_name = "ID=PATH", value_parser = parse_source, required = true)]
    sources: Vec<SourceArg>,

    /// Latitude used for distances and sorting.
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude used for distances and sorting.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Only list centers within this many miles.
    #[arg(long, value_name = "MILES")]
    within: Option<f64>,

    /// Write tracing output to this file (filtered by `RUST_LOG`).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct SourceArg {
    id: String,
    path: PathBuf,
}

fn parse_source(raw: &str) -> Result<SourceArg, String> {
    let (id, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=PATH, got {raw:?}"))?;
    let id = id.trim();
    if id.is_empty() || path.trim().is_empty() {
        return Err(format!("expected ID=PATH, got {raw:?}"));
    }
    Ok(SourceArg {
        id: id.to_owned(),
        path: PathBuf::from(path.trim()),
    })
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    // The terminal belongs to the UI, so logs only go to a file.
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    // Sources + service setup
    let plugins = cli
        .sources
        .iter()
        .map(|source| features::plugin(features::region_meta(&source.id, &source.id), &source.path))
        .collect();
    let registry = Arc::new(SourceRegistry::new(plugins));
    let service = Arc::new(RecyclingService::new(registry));

    let origin = cli.lat.zip(cli.lng).map(|(lat, lng)| Coordinates { lat, lng });
    info!(regions = cli.sources.len(), ?origin, within = ?cli.within, "starting recyfind");

    // App state
    let app = App::new(service, origin, cli.within);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        app.refresh_clock(false);

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(250))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Command::Quit => break,
                Command::None => {}
                Command::LoadCenters => {
                    let Some(region) = app.selected_region.clone() else {
                        app.error_message = Some("Select a region first".into());
                        continue;
                    };

                    match app.service.load_centers(&region) {
                        Ok(centers) => {
                            app.error_message = None;
                            app.center_list_index = 0;
                            app.dispatch(Action::CentersLoaded(centers));
                            app.screen = Screen::CenterList;
                        }
                        Err(err) => {
                            app.error_message = Some(format!("Failed to load centers: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
