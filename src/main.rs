use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyEventKind;

use sysgauge::app::App;
use sysgauge::config::{self, load_config, load_config_from_path};
use sysgauge::event::{Event, EventHandler};
use sysgauge::logging;
use sysgauge::system::engine::UtilizationEngine;
use sysgauge::system::refresher::{REFRESH_INTERVAL, Refresher};
use sysgauge::system::sampler::{ProcSampler, RawSampler};
use sysgauge::ui;

#[derive(Parser)]
#[command(
    name = "sysgauge",
    about = "Live TUI dashboard for host CPU and memory utilization"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read stat/uptime from this directory instead of /proc
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Sample one window, print it as JSON and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Write JSON logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_json_file(path)?;
    }
    let config = load_config_for_cli(&cli);

    let sampler = match &cli.proc_root {
        Some(root) => ProcSampler::with_root(root),
        None => ProcSampler::new(),
    };
    let engine = UtilizationEngine::new(sampler);

    if cli.once {
        return run_once(engine).await;
    }

    // ratatui::init also installs a panic hook that restores the terminal.
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config, engine).await;
    ratatui::restore();

    result
}

async fn run<S>(
    terminal: &mut ratatui::DefaultTerminal,
    config: &config::Config,
    engine: UtilizationEngine<S>,
) -> Result<()>
where
    S: RawSampler + Send + 'static,
{
    let mut app = App::new(config, engine.snapshot());
    let mut events = EventHandler::new();
    let refresher = Refresher::spawn(engine, events.sender(), Event::Refresh);

    let result = event_loop(terminal, &mut app, &mut events, &refresher).await;

    // Stop then join, so the engine is never read after teardown starts.
    refresher.shutdown().await?;
    result
}

async fn event_loop<S>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    events: &mut EventHandler,
    refresher: &Refresher<S>,
) -> Result<()>
where
    S: RawSampler + Send + 'static,
{
    terminal.draw(|frame| ui::draw(frame, app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Key(_) => false,
            Event::Resize => true,
            Event::Refresh(snapshot) => {
                app.apply_snapshot(snapshot);
                true
            }
        };

        if app.take_refresh_request() {
            refresher.refresh_now();
        }
        if should_draw && app.running {
            terminal.draw(|frame| ui::draw(frame, app))?;
        }
    }

    Ok(())
}

async fn run_once<S: RawSampler>(mut engine: UtilizationEngine<S>) -> Result<()> {
    tokio::time::sleep(REFRESH_INTERVAL).await;
    engine.update();
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    }
}
