//! `stagetimer` - Stage countdown timer client
//!
//! `stagetimer viewer` shows the timers full-screen for the audience,
//! `stagetimer admin` opens the operator console, and `stagetimer status`
//! prints the current state once.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stagetimer::{
    api::{ApiClient, Notifier},
    config::{ClientConfig, ConfigManager},
    controller::{
        AdminCommand, AdminController, AdminEvent, Console, ConsoleNotifier, SharedConsole,
        parse_command,
    },
    error::get_user_friendly_error,
    monitor::{PollEvent, StatusPoller},
    utils,
    viewer::{TerminalSurface, ViewerApp, ViewerRenderer},
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use tracing::{error, info, warn};

/// Capacity of the bounded event channels
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Stage countdown timer client
#[derive(Debug, Parser)]
#[command(name = "stagetimer", version, about)]
struct Args {
    /// Base URL of the timer service (overrides the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Directory holding config.json and the log files
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Full-screen audience viewer
    Viewer {
        /// Status polling interval in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },
    /// Interactive operator console
    Admin {
        /// Admin PIN used to open a session
        #[arg(long)]
        pin: Option<String>,
        /// Status polling interval in milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },
    /// Print the current timers once
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = args
        .config_dir
        .clone()
        .unwrap_or_else(ConfigManager::get_config_dir);
    utils::init_logging(&config_dir, args.verbose).context("Failed to initialize logging system")?;

    let config_path = ConfigManager::config_path_in(&config_dir);
    let mut config =
        ConfigManager::load_from(&config_path).context("Failed to load client configuration")?;
    if let Some(url) = args.url {
        config.service.base_url = url;
    }
    info!("Using timer service at {}", config.service.base_url);

    match args.command {
        Command::Viewer { interval_ms } => {
            if let Some(ms) = interval_ms {
                config.polling.viewer_interval_ms = ms;
            }
            run_viewer(&config)
        }
        Command::Admin { pin, interval_ms } => {
            if let Some(ms) = interval_ms {
                config.polling.admin_interval_ms = ms;
            }
            run_admin(config, config_path, pin.as_deref())
        }
        Command::Status => print_status(&config),
    }
}

fn build_client(config: &ClientConfig) -> Result<ApiClient> {
    ApiClient::new(&config.service).map_err(|e| {
        eprintln!("{}", get_user_friendly_error(&e));
        anyhow::Error::new(e).context("Failed to create timer service client")
    })
}

fn run_viewer(config: &ClientConfig) -> Result<()> {
    let client = Arc::new(build_client(config)?);
    let renderer = ViewerRenderer::new(client.uploads().clone());

    let (tx, rx) = mpsc::sync_channel::<PollEvent>(EVENT_CHANNEL_CAPACITY);
    let _poller = StatusPoller::new(client, config.polling.viewer_interval(), tx).start();

    let mut surface = TerminalSurface::new().context("Failed to open the terminal display")?;
    ViewerApp::new(renderer, rx)
        .run(&mut surface)
        .context("Viewer display failed")
}

fn run_admin(config: ClientConfig, config_path: PathBuf, pin: Option<&str>) -> Result<()> {
    let console = Console::stdout().shared();
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new(Arc::clone(&console)));
    let client = Arc::new(build_client(&config)?.with_notifier(Arc::clone(&notifier)));

    if let Some(pin) = pin {
        if let Err(e) = client.login(pin) {
            error!("Admin login failed: {e}");
            console.lock().notice(&get_user_friendly_error(&e));
            return Err(anyhow::Error::new(e).context("Admin login failed"));
        }
        info!("Admin session opened");
    }

    let (tx, rx) = mpsc::sync_channel::<AdminEvent>(EVENT_CHANNEL_CAPACITY);
    let _poller =
        StatusPoller::new(Arc::clone(&client), config.polling.admin_interval(), tx.clone()).start();
    spawn_stdin_reader(tx, Arc::clone(&console));

    let mut controller = AdminController::new(client, config, config_path, console, notifier);
    controller.initialize();
    controller.run(&rx);
    Ok(())
}

/// Read console lines on a background thread and forward parsed commands
fn spawn_stdin_reader(sender: mpsc::SyncSender<AdminEvent>, console: SharedConsole) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read console input: {e}");
                    break;
                }
            };

            match parse_command(&line) {
                Ok(Some(command)) => {
                    if sender.send(AdminEvent::Command(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => console.lock().line("> "),
                Err(e) => console.lock().line(&e.render().to_string()),
            }
        }

        // End of input behaves like `quit`
        let _ = sender.send(AdminEvent::Command(AdminCommand::Quit));
    });
}

fn print_status(config: &ClientConfig) -> Result<()> {
    let client = build_client(config)?;
    let snapshot = client.timer_status().map_err(|e| {
        eprintln!("{}", get_user_friendly_error(&e));
        anyhow::Error::new(e).context("Failed to fetch timer status")
    })?;

    let mut renderer = ViewerRenderer::new(client.uploads().clone());
    for line in renderer.apply(&snapshot).render_text_lines() {
        println!("{line}");
    }
    Ok(())
}
