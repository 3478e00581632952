mod app;
mod cli;
mod cmd;
mod handlers;
mod tui;

use anyhow::{Context, Result};
use app::{App, AppEvent, InputMode, ViewTab};
use chronoscope::config::{self, Config};
use chronoscope::dataset::{self, TagCatalog};
use chronoscope::session::{Session, SessionOptions};
use chronoscope::timeline::LayoutParams;
use clap::Parser;
use cli::{Commands, ConfigAction};
use crossterm::{
    event::{self as crossterm_event, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const INPUT_POLL_DURATION_MS: u64 = 100;
/// Table borders plus header row
const TABLE_CHROME_HEIGHT: u16 = 3;
const LOG_FILE_NAME: &str = "chronoscope.log";

#[derive(Parser, Debug)]
#[command(name = "chronoscope")]
#[command(
    about = "Explore dated historical records as a filterable table and a zoomable timeline",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Events document ({ "events": [...] })
    #[arg(value_name = "EVENTS")]
    events: Option<PathBuf>,

    /// Tag document with related tags ({ "tags": [...] })
    #[arg(long = "tags", value_name = "FILE", global = true)]
    tags: Option<PathBuf>,

    /// Use this config file instead of discovering one
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("CHRONOSCOPE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if std::env::var("DEBUG").is_ok() {
            "chronoscope=debug,info"
        } else {
            "chronoscope=info,warn"
        })
    })
}

/// Subcommands log to stderr.
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

/// The viewer owns the terminal, so its log goes to a file in the cache dir.
/// Without a cache dir nothing is logged.
fn init_tui_tracing() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("chronoscope");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE_NAME);
    let file = File::create(&path).ok()?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Some(path)
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let loaded = match explicit {
        Some(path) => config::load_single_file(path),
        None => config::load(&config::discover()),
    };
    // ConfigError renders Cargo-style; keep that text intact
    loaded.map_err(|e| anyhow::anyhow!("{}", e))
}

/// Config for a subcommand, reporting errors the way `config validate` does.
fn cli_config(explicit: Option<&Path>) -> Result<Config, i32> {
    load_config(explicit).map_err(|e| {
        eprintln!("{}", e);
        1
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(command) = args.command {
        init_cli_tracing();
        let result = match command {
            Commands::Config { action } => match action {
                ConfigAction::Validate => cmd::config::validate(args.config.as_deref()),
                ConfigAction::Show => cmd::config::show(args.config.as_deref()),
            },
            Commands::Tags(tags_args) => cmd::print::tags(&tags_args, args.tags.as_deref()),
            Commands::Table(query) => {
                cli_config(args.config.as_deref()).and_then(|cfg| cmd::print::table(&query, &cfg))
            }
            Commands::Timeline(query) => cli_config(args.config.as_deref())
                .and_then(|cfg| cmd::print::timeline(&query, &cfg)),
        };
        if let Err(code) = result {
            std::process::exit(code);
        }
        return Ok(());
    }

    let Some(events_path) = args.events else {
        eprintln!("Usage: chronoscope <EVENTS> [--tags FILE] [--config FILE]");
        eprintln!("       chronoscope <COMMAND> --help");
        std::process::exit(1);
    };

    let log_path = init_tui_tracing();
    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if let Some(source) = &config.source {
        tracing::info!(path = %source.display(), "using config");
    }

    // Load failures degrade to an empty dataset
    let records = dataset::load_events_or_empty(&events_path);
    let mut catalog = TagCatalog::from_records(&records);
    if let Some(tags_path) = &args.tags {
        catalog = catalog.with_details(dataset::load_tags_or_empty(tags_path));
    }

    let options = SessionOptions {
        visibility: config.visibility(),
        sort: config.sort_state(),
        layout: LayoutParams::cells(config.node_gap),
        year_debounce: config.year_debounce,
        ..SessionOptions::default()
    };
    let mut app = App::new(Session::new(records, options).with_catalog(catalog));
    if app.session.records().is_empty() {
        let hint = match &log_path {
            Some(path) => format!("No records loaded (see {})", path.display()),
            None => "No records loaded".to_string(),
        };
        app.set_status(hint);
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %format!("{:#}", err), "viewer exited with an error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Rows that fit in the table body at the last render.
fn table_page_size(app: &App) -> usize {
    app.layout.table.height.saturating_sub(TABLE_CHROME_HEIGHT).max(1) as usize
}

/// Wait no longer than the next scheduled session task.
fn poll_timeout(app: &App, now: Instant) -> Duration {
    let idle = Duration::from_millis(INPUT_POLL_DURATION_MS);
    match app.session.next_deadline() {
        Some(deadline) => deadline.saturating_duration_since(now).min(idle),
        None => idle,
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if let Err(e) = tui::render(f, app) {
                tracing::error!(error = %e, "render failed");
            }
        })?;

        if app.is_entering_text() {
            terminal.show_cursor()?;
        } else {
            terminal.hide_cursor()?;
        }

        let mut events = Vec::new();
        if crossterm_event::poll(poll_timeout(app, Instant::now()))? {
            match crossterm_event::read()? {
                Event::Key(key) => {
                    events.extend(handlers::input::handle_input_event(key, app));

                    // Page size comes from the last rendered table area
                    let paging = !app.show_help
                        && app.input_mode == InputMode::Normal
                        && app.view == ViewTab::Table;
                    if paging && matches!(key.code, KeyCode::PageDown) {
                        events.push(AppEvent::PageDown(table_page_size(app)));
                    } else if paging && matches!(key.code, KeyCode::PageUp) {
                        events.push(AppEvent::PageUp(table_page_size(app)));
                    }
                }
                Event::Mouse(mouse) => {
                    events.extend(handlers::input::handle_mouse_event(mouse, app));
                }
                _ => {}
            }
        }

        for event in events {
            app.apply_event(event);
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
