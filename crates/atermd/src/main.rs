//! ATermD - a retro desktop terminal with ten tabs, a launcher and a context menu.
//!
//! Main entry point for the application.

mod app;
mod keys;
mod terminal_guard;
mod tty_host;

use anyhow::{Context, Result};
use app::App;
use atermd_workspace::Workspace;
use launcher::LauncherController;
use once_cell::sync::Lazy;
use platform::NativeSpawner;
use settings::constants::tabs;
use settings::ConfigStore;
use std::io;
use std::time::Instant;
use terminal::{PtyBackend, SessionRegistry};
use terminal_guard::TerminalGuard;
use tracing::{debug, error, info};
use tty_host::TtyHost;

/// Application startup time for performance monitoring
static STARTUP_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Create the config and log directories.
fn init_paths() -> Result<()> {
    let config_dir = atermd_paths::config_dir();
    let logs_dir = atermd_paths::logs_dir();

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", logs_dir))?;
    Ok(())
}

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("ATERMD_DEBUG").is_ok()
}

/// Log to a file; the terminal itself is the UI.
fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "atermd=trace,launcher=trace,terminal=trace,info"
    } else {
        "atermd=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let path = atermd_paths::log_file();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    if is_debug_mode() {
        info!(
            "ATermD v{} starting up (DEBUG MODE ENABLED)",
            env!("CARGO_PKG_VERSION")
        );
    } else {
        info!("ATermD v{} starting up", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}

fn run() -> Result<()> {
    let shell = terminal::resolve_shell();
    let (cols, rows) = crossterm::terminal::size().context("Not running in a terminal")?;

    let backend = PtyBackend::new(rows.saturating_sub(1).max(1), cols);
    let registry = SessionRegistry::initialize(
        tabs::COUNT,
        Box::new(backend.clone()),
        Box::new(ConfigStore::load_default()),
        &shell,
    )?;
    let launcher = LauncherController::new(atermd_paths::applications_dir().clone());

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout)?;
    if guard.key_reporting() {
        debug!("Keyboard enhancement enabled");
    } else {
        info!("Terminal cannot report lone Super presses");
    }

    let host = TtyHost::new(
        Box::new(stdout),
        Box::new(crossterm::event::read),
        cols,
        rows,
    );
    host.init_layout();

    let workspace = Workspace::new(
        registry,
        launcher,
        Box::new(host.clone()),
        Box::new(NativeSpawner),
    );
    info!("Started in {:?}", STARTUP_TIME.elapsed());

    let result = App::new(workspace, backend, host).run();
    drop(guard);
    result
}

fn main() {
    Lazy::force(&STARTUP_TIME);

    if let Err(e) = init_paths() {
        eprintln!("Warning: {:#}", e);
    }
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    if let Err(e) = run() {
        error!("Fatal: {:#}", e);
        eprintln!("atermd: {:#}", e);
        std::process::exit(1);
    }
}
