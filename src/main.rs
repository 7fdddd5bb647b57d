//! popcorn - search movies, rate them, keep a watched list
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! popcorn
//!
//! # CLI mode (for automation)
//! popcorn search "inception"
//! popcorn watched add tt1375666 --rating 9
//! popcorn watched stats --json
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use popcorn::cli::{self, Cli, Command, ExitCode, Output};
use popcorn::commands::{self, Context};
use popcorn::config::Config;
use popcorn::logging;
use popcorn::storage::FileStorage;
use popcorn::{ui, App};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let _guard = logging::init_logging(cli.verbose, cli.quiet, None)?;
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: the terminal belongs to ratatui, so logs go to a file
        let log_dir = config.log_dir();
        let _guard = logging::init_logging(cli.verbose, cli.quiet, Some(&log_dir))?;
        run_tui(&config).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);
    let ctx = Context::from_config(config);

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,

        Some(Command::Info(cmd)) => {
            if let Err(e) = cli::validate_imdb_id(&cmd.id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::info_cmd(cmd, &ctx, &output).await
        }

        Some(Command::Watched(cmd)) => {
            let id = match &cmd {
                cli::WatchedCmd::Add(add) => Some(add.id.as_str()),
                cli::WatchedCmd::Remove(remove) => Some(remove.id.as_str()),
                _ => None,
            };
            if let Some(Err(e)) = id.map(cli::validate_imdb_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::watched_cmd(cmd, &ctx, &output).await
        }

        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state, leaving `title` as the window title
fn restore_terminal(terminal: &mut Tui, title: &str) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), SetTitle(title), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: &Config) -> Result<()> {
    let ctx = Context::from_config(config);
    let storage = FileStorage::in_dir(&ctx.data_dir);
    info!(storage = %storage.path().display(), "starting TUI");

    let mut app = App::new(Arc::clone(&ctx.source), Box::new(storage), ctx.timeout);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    app.shutdown();
    restore_terminal(&mut terminal, &app.title().get())?;

    if let Err(ref e) = result {
        error!(error = %e, "TUI exited with error");
    }
    result
}

/// Main event loop - handles input, applies finished fetches, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let mut shown_title = String::new();

    while app.running {
        let title = app.title().get();
        if title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shown_title = title;
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick();
    }

    Ok(())
}
