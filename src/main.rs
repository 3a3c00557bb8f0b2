mod app;
mod commit;
mod config;
mod cull;
mod logging;
mod preview_api;
mod scanner;
mod sidecar;
mod sync;
mod trash;
mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;

use app::App;
use config::Config;

fn parse_args() -> (Option<PathBuf>, Option<PathBuf>) {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut open_dir = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("culpho {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            arg if !arg.starts_with('-') && open_dir.is_none() => {
                open_dir = Some(PathBuf::from(arg));
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    (config_path, open_dir)
}

fn print_help() {
    println!(
        r#"culpho - TUI photo culling application

USAGE:
    culpho [OPTIONS] [DIRECTORY]

ARGS:
    DIRECTORY           Culling directory to open on startup

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    CULPHO_CONFIG       Path to config file (overrides default location)
    CULPHO_LOG          Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/culpho/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config_path, open_dir) = parse_args();

    // Initialize logging (uses journald on Linux, file fallback otherwise)
    let _ = logging::init(None);

    // Load configuration
    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    // Start the loopback preview service before taking over the terminal
    let preview_server = preview_api::start().await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(config, preview_server);
    if let Some(dir) = open_dir {
        if let Err(e) = app.open_catalog(&dir) {
            app.status_message = Some(e.to_string());
        }
    }
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
