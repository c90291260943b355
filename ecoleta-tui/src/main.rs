//! Terminal UI for Ecoleta that registers recycling collection points.

mod app;
mod config;
mod input;
mod logging;
mod map;
mod ui;

use std::{io, path::PathBuf, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecoleta_core::{
    collaborators::Collaborators,
    form::{Effect, FormEvent},
    model::GeoPoint,
    ports::LocationPort,
    service::RegistrationService,
};
use ecoleta_provider_api as api;
use ecoleta_provider_geoip as geoip;
use ecoleta_provider_ibge as ibge;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use crate::app::App;
use crate::config::{Config, LocationConfig};
use crate::input::Action;

/// Register waste collection points with the Ecoleta backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file; defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ecoleta backend root URL, overriding the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Localities API root URL, overriding the config file
    #[arg(long)]
    geography_url: Option<String>,

    /// Log file; defaults to the platform data directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Answer from a spawned request, tagged with the screen activation it belongs to.
type Answer = (u64, FormEvent);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(url) = args.geography_url {
        config.geography.base_url = url;
    }

    let log_file = match args.log_file {
        Some(path) => path,
        None => logging::default_log_file()?,
    };
    logging::init(&log_file, args.verbose)?;
    info!(api = %config.api.base_url, geography = %config.geography.base_url, "starting");

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(config.http.user_agent.as_str())
        .timeout(config.http.timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let collaborators = Collaborators::new(
        api::catalog(client.clone(), config.api.base_url.as_str()),
        ibge::geography(client.clone(), config.geography.base_url.as_str()),
        location_port(&config.location, client),
    );
    let service = RegistrationService::new(Arc::new(collaborators));

    // App state
    let app = App::new(service, config.map.zoom);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("exiting");
    res
}

fn location_port(location: &LocationConfig, client: Client) -> Arc<dyn LocationPort> {
    match location {
        LocationConfig::Ip { url } => geoip::ip_lookup(client, url.as_str()),
        LocationConfig::Fixed {
            latitude,
            longitude,
        } => geoip::fixed(GeoPoint::new(*latitude, *longitude)),
        LocationConfig::Off => geoip::disabled(),
    }
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    let (answers_tx, mut answers_rx) = unbounded_channel::<Answer>();

    loop {
        // Draw current UI
        let completed = terminal.draw(|frame| ui::draw(frame, &app))?;
        app.viewport = completed.area;

        // Merge answers that arrived since the last frame
        drain_answers(&mut app, &mut answers_rx, &answers_tx);

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if !event::poll(StdDuration::from_millis(100))? {
            continue;
        }

        let action = match event::read()? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                input::handle_key_event(key, &mut app)
            }
            CEvent::Mouse(mouse) => input::handle_mouse_event(mouse, &mut app),
            _ => Action::None,
        };

        match action {
            Action::Quit => break,
            Action::None => {}
            Action::OpenCreatePoint => {
                let effects = app.open_create_point();
                perform(&mut app, effects, &answers_tx);
            }
            Action::Form(event) => {
                let effects = app.apply(event);
                perform(&mut app, effects, &answers_tx);
            }
        }
    }

    Ok(())
}

fn drain_answers(
    app: &mut App,
    answers_rx: &mut UnboundedReceiver<Answer>,
    answers_tx: &UnboundedSender<Answer>,
) {
    while let Ok((generation, event)) = answers_rx.try_recv() {
        let effects = app.receive(generation, event);
        perform(app, effects, answers_tx);
    }
}

/// Carry out effects: requests run as tasks that answer through the channel.
fn perform(app: &mut App, effects: Vec<Effect>, answers_tx: &UnboundedSender<Answer>) {
    for effect in effects {
        match effect {
            Effect::Request(request) => {
                debug!(?request, "dispatching request");
                let service = app.service.clone();
                let generation = app.generation;
                let answers_tx = answers_tx.clone();
                tokio::spawn(async move {
                    let answer = service.run(request).await;
                    // The receiver only goes away when the app is quitting.
                    if answers_tx.send((generation, answer)).is_err() {
                        debug!("answer dropped after shutdown");
                    }
                });
            }
            Effect::NavigateHome => app.navigate_home(),
        }
    }
}
