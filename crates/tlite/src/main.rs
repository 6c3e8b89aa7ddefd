use std::env;
use std::io::{self, Stdout};

use anyhow::{bail, Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use tlite::app::App;
use tlite::config;

fn print_version() {
    println!("tlite {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("tlite - A keyboard-first SQLite shell for the terminal");
    eprintln!();
    eprintln!("Usage: tlite [OPTIONS] <DATABASE_PATH>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <DATABASE_PATH>  Path to the SQLite database file");
    eprintln!("                   (~ and environment variables are expanded)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help       Print this help message");
    eprintln!("  -V, --version    Print version information");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  tlite app.db");
    eprintln!("  tlite ~/data/app.db");
    eprintln!("  tlite \"$PROJECT_DIR/app.db\"");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    let Some(database_path) = args.get(1).filter(|a| !a.starts_with('-')) else {
        print_usage();
        bail!("required argument missing: <DATABASE_PATH>");
    };

    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {e}");
        config::Config::default()
    });

    let mut terminal =
        init_terminal().context("failed to initialize terminal; are you running in a real TTY?")?;

    let mut app = App::new(database_path.clone(), &cfg);
    let res = app.run(&mut terminal);

    restore_terminal(terminal)?;

    res
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
