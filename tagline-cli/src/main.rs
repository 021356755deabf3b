//! Tagline CLI - Terminal-based span tagging tool

mod config;
mod io;
mod transmit;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tagline_core::{App, Effect, Key};

use crate::config::Config;
use crate::transmit::Transmitter;

/// Tag entity spans in a paginated text dataset.
#[derive(Parser)]
#[command(name = "tagline", version, about, long_about = None)]
struct Cli {
    /// Dataset to annotate: a JSON array of {id, text} rows, or a text file
    /// with one page per line.
    dataset: PathBuf,

    /// Path to configuration file.
    #[arg(short, long, default_value = "tagline.toml")]
    config: PathBuf,

    /// Base URL of the persistence server (overrides the config file).
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory for labeled_dataset.json (overrides the config file).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Dataset name written to the export record (defaults to the file name).
    #[arg(long)]
    name: Option<String>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    if let Some(endpoint) = cli.endpoint {
        config.export.endpoint = endpoint;
    }
    if let Some(out_dir) = cli.out_dir {
        config.export.out_dir = out_dir;
    }

    init_tracing(&config, cli.verbose)?;

    let session = io::load_dataset(&cli.dataset, cli.name.as_deref())?;
    info!(
        dataset = %session.dataset_name,
        pages = session.store.total_pages(),
        "loaded dataset"
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut transmitter = Transmitter::new(config.export_url(), runtime.handle().clone());
    info!(url = transmitter.url(), "export endpoint");

    let mut app = App::new(session);
    app.set_status(&format!(
        "Loaded {} pages. Press 1-4 to pick a tag, '?' for help",
        app.session.store.total_pages()
    ));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut transmitter, &config.export.out_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        error!(error = %e, "terminal loop failed");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_tracing(config: &Config, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let file = File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file {}", config.logging.file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    transmitter: &mut Transmitter,
    out_dir: &Path,
) -> Result<()> {
    while app.running {
        while let Some(result) = transmitter.poll() {
            match result {
                Ok(report) => app.set_status(&match report.success {
                    Some(false) => "Server rejected the export".to_string(),
                    _ => format!("Export uploaded ({})", report.status),
                }),
                Err(e) => app.set_status(&format!("Upload failed: {}", e)),
            }
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.running = false;
                continue;
            }

            let Some(key) = map_key(key.code) else {
                continue;
            };

            if app.handle_key(key) == Effect::Export {
                export(app, transmitter, out_dir);
            }
        }
    }
    Ok(())
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Save the payload locally, then hand the same payload to the uploader.
///
/// A failed write still uploads, and the upload never waits on the file.
fn export(app: &mut App, transmitter: &Transmitter, out_dir: &Path) {
    let json = match app.export_json() {
        Ok(json) => json,
        Err(e) => {
            app.set_status(&format!("Serialization failed: {}", e));
            return;
        }
    };

    match io::save_export(out_dir, &json) {
        Ok(path) => {
            info!(path = %path.display(), "export written");
            app.set_status(&format!("Exported to {}, uploading...", path.display()));
        }
        Err(e) => {
            error!(error = %e, "export write failed");
            app.set_status(&format!("Export failed: {}", e));
        }
    }

    transmitter.send(json);
}
