//! student-roster binary entry point.
//!
//! Parses flags, sets up file logging, initializes the terminal in raw mode,
//! runs the TUI event loop, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use student_roster::app::{self, AppState};
use student_roster::error::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "student-roster", about = "Manage a class list of students", version)]
struct Cli {
    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "STUDENT_ROSTER_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file (defaults to student-roster.log in the config directory).
    #[arg(long, env = "STUDENT_ROSTER_LOG")]
    log_file: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "STUDENT_ROSTER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Route tracing output to a file; stdout belongs to the TUI.
fn init_logging(path: &Path, level: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = app::config_dir(cli.config_dir.as_deref());
    app::ensure_config_dir(&config_dir)?;
    let log_file = cli
        .log_file
        .unwrap_or_else(|| config_dir.join("student-roster.log"));
    init_logging(&log_file, &cli.log_level)?;
    tracing::info!(config_dir = %config_dir.display(), "starting student-roster");

    let mut state = AppState::from_config_dir(&config_dir);
    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    println!("--- EXITED PROGRAM ---\nSEE YOU AGAIN . . .");
    Ok(())
}
