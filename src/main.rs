use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use arbor::app::App;
use arbor::config::{self, Config, LoadedConfig};
use arbor::logging;
use arbor::ui::draw_ui;

/// How long the loop waits for input before polling background work.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal UI for agent sessions on git worktrees.
#[derive(Parser, Debug)]
#[command(name = "arbor", version, about)]
struct Args {
    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pin new sessions to this repository.
    #[arg(long, value_name = "REPO")]
    repo: Option<String>,

    /// JSON file with issues for the issue picker.
    #[arg(long, value_name = "PATH")]
    issues: Option<String>,

    /// Allow sessions to run inside a container.
    #[arg(long)]
    containers: bool,
}

impl Args {
    /// Command-line flags win over the config file and environment.
    fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.sessions.locked_repo = Some(repo.clone());
        }
        if let Some(issues) = &self.issues {
            config.sessions.issues_file = Some(issues.clone());
        }
        if self.containers {
            config.sessions.containers_enabled = true;
        }
        config.normalize();
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let args = Args::parse();

    let mut loaded_config = config::load_config(args.config.as_deref());
    args.apply(&mut loaded_config.config);

    // Logging needs the configured level, so it starts right after config.
    let (session_id, _guard) = match logging::init(&loaded_config.config.logging.level) {
        Ok(ctx) => {
            logging::cleanup_old_logs(&ctx.log_directory);
            debug!(log_directory = %ctx.log_directory.display(), "logging_ready");
            (ctx.session_id, Some(ctx._guard))
        }
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            ("------".to_string(), None)
        }
    };

    debug!(
        config_path = %loaded_config.config_path.display(),
        status = ?loaded_config.status,
        args = ?args,
        "config_loaded"
    );

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(terminal, session_id.clone(), loaded_config);

    // Restore terminal even when the loop failed.
    if let Err(e) = disable_raw_mode() {
        warn!(error = %e, "disable_raw_mode_failed");
    }
    execute!(io::stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        warn!(error = %format!("{e:#}"), "run_failed");
    }
    info!(
        session_id = %session_id,
        duration_secs = start_time.elapsed().as_secs_f64(),
        "session_end"
    );

    result
}

fn run_app(
    mut terminal: Terminal<CrosstermBackend<io::Stdout>>,
    session_id: String,
    loaded_config: LoadedConfig,
) -> Result<()> {
    let mut app = App::new(session_id, loaded_config);

    while !app.should_quit {
        app.poll_issue_loads();

        terminal.draw(|f| draw_ui(f, &mut app))?;

        if crossterm::event::poll(POLL_INTERVAL)? {
            match crossterm::event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_, _) => {
                    // Picked up by the next draw
                }
                _ => {}
            }
        }
    }

    Ok(())
}
