use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use td_core::config::{expand_home, Config};
use td_tui::app::App;
use td_tui::executor::Collaborators;
use td_tui::scheduler::{self, Scheduler};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "td-tui", about = "Terminal dashboard for support investigations")]
struct Args {
    /// Config file (default ~/.triage-deck/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Control-plane base URL.
    #[arg(long)]
    api: Option<String>,
    /// Investigation CLI binary.
    #[arg(long)]
    cli: Option<String>,
    /// Investigations directory.
    #[arg(long)]
    dir: Option<String>,
    /// Show the debug overlay.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let log_path = expand_home(&config.general.log_file);
    td_telemetry::logging::init_file_logging("td-tui", &config.general.log_level, &log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;
    info!(
        cli = %config.cli.path,
        api = %config.api.base_url,
        dir = %config.paths.investigations_dir,
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    // Set up panic hook to restore terminal on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run(&config, runtime.handle().clone());

    restore_terminal()?;
    runtime.shutdown_background();
    result
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };
    if let Some(api) = &args.api {
        config.api.base_url = api.clone();
    }
    if let Some(cli) = &args.cli {
        config.cli.path = cli.clone();
    }
    if let Some(dir) = &args.dir {
        config.paths.investigations_dir = dir.clone();
    }
    if args.debug {
        config.ui.debug_overlay = true;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(config: &Config, handle: tokio::runtime::Handle) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = flume::unbounded();
    let collaborators = Arc::new(Collaborators::from_config(config));
    let scheduler = Scheduler::new(handle, collaborators, tx.clone());
    scheduler::spawn_input(tx);

    let mut app = App::new(config.ui.debug_overlay).with_log_window(config.sync.log_window);
    scheduler::run(&mut terminal, &mut app, &scheduler, &rx)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
