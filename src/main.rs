//! tforms - live formula forms in the terminal
//!
//! Loads a page of inputs and formula fields, then runs an interactive
//! terminal session where every edit recomputes the formulas.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use tforms::application::{App, AppMode};
use tforms::infrastructure::{Config, PageRepository};
use tforms::presentation::{render_ui, InputHandler};

#[derive(Parser)]
#[command(name = "tforms", version, about = "Live formula forms in the terminal")]
struct Cli {
    /// Page definition (JSON); the built-in demo page when omitted
    page: Option<PathBuf>,

    /// Config file (TOML); falls back to $TFORMS_CONFIG, then the user config dir
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print every formula result once and exit
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&config, cli.log_file)?;

    let page = PageRepository::load_or_demo(cli.page.as_deref())
        .with_context(|| match &cli.page {
            Some(path) => format!("loading page {}", path.display()),
            None => "loading demo page".to_string(),
        })?;
    let mut app = App::new(&page, config.markup).context("building page")?;
    info!(title = %app.title, formulas = app.evaluator.formulas().len(), "page ready");

    if cli.print {
        for view in app.formula_views() {
            println!("{}: {}", view.label, view.text);
        }
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Sends tracing output to a file so it never draws over the TUI.
/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &Config, override_file: Option<PathBuf>) -> Result<WorkerGuard> {
    let path = override_file.unwrap_or_else(|| config.log_file());
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir).with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tforms.log"));

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Draws and dispatches keys until `q` is pressed in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
