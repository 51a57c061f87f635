//! daylimit - daily screen-time budget with automatic logout
//!
//! This is the main entry point. It wires together:
//! - Configuration loading
//! - Store initialization
//! - Countdown engine
//! - Logout action (simulated or real)
//! - Terminal shell

mod shell;
mod signals;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daylimit_config::{load_config_or_default, Policy};
use daylimit_core::{CoreEvent, CountdownEngine, DayLedger, EngineConfig, Session, TICK_INTERVAL};
use daylimit_host_api::{LogoutAction, LogoutMode};
use daylimit_host_os::SystemLogout;
use daylimit_store::{JsonStore, Store};
use daylimit_util::{current_day_key, default_config_path, format_hms, is_mock_time_active};
use shell::Shell;
use signals::CloseSignals;
use std::io::{BufRead, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// How long an unacknowledged notice stays up before exit
const NOTICE_HOLD: std::time::Duration = std::time::Duration::from_secs(10);

/// daylimit - Daily screen-time budget with automatic logout
#[derive(Parser, Debug)]
#[command(name = "daylimit")]
#[command(about = "Daily screen-time budget with automatic logout", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/daylimit/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set DAYLIMIT_DATA_DIR env var)
    #[arg(short, long, env = "DAYLIMIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// End the real OS session, overriding `dry_run` in the config
    #[arg(long)]
    real_logout: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run the countdown (default)
    Run,
    /// Print today's limit, used and remaining time
    Status,
    /// Print the most recent activity log entries
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

/// The running countdown
struct Service {
    engine: CountdownEngine,
    shell: Shell<Stdout>,
    mode: LogoutMode,
    enforce_on_close: bool,
}

impl Service {
    fn new(args: &Args, policy: &Policy, store: Arc<dyn Store>) -> Self {
        let mode = if args.real_logout {
            LogoutMode::Real
        } else {
            LogoutMode::from_dry_run(policy.logout.dry_run)
        };
        let logout: Arc<dyn LogoutAction> = Arc::new(SystemLogout::new(mode));

        let config = EngineConfig::from_policy(policy);
        let engine = CountdownEngine::new(config, store, logout, daylimit_util::now());

        Self {
            engine,
            shell: Shell::stdout(),
            mode,
            enforce_on_close: config.enforce_logout_on_close,
        }
    }

    async fn run(mut self) -> Result<()> {
        let mut close_signals = CloseSignals::new()?;
        let mut commands = spawn_stdin_reader();
        let mut stdin_open = true;

        self.shell
            .banner(self.mode, self.enforce_on_close)
            .context("Failed to write to terminal")?;

        let events = self.engine.start();
        self.present(&events, &mut commands, stdin_open).await?;

        // First tick fires immediately
        let mut tick_timer = tokio::time::interval(TICK_INTERVAL);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Countdown running");

        while !self.engine.is_terminal() {
            let events = tokio::select! {
                _ = tick_timer.tick() => {
                    match self.engine.tick(daylimit_util::now()) {
                        Ok(tick) => tick.events,
                        Err(e) => {
                            error!(error = %e, "Usage can no longer be recorded, stopping");
                            return Err(anyhow::Error::new(e).context("Failed to record usage"));
                        }
                    }
                }

                source = close_signals.recv() => {
                    info!(source, "Close requested");
                    self.engine.on_window_close_requested()
                }

                line = commands.recv(), if stdin_open => {
                    match line {
                        Some(command) => self.handle_command(command.trim())?,
                        None => {
                            debug!("stdin closed, commands disabled");
                            stdin_open = false;
                            Vec::new()
                        }
                    }
                }
            };

            self.present(&events, &mut commands, stdin_open).await?;
        }

        info!(phase = ?self.engine.phase(), "Countdown finished");
        Ok(())
    }

    fn handle_command(&mut self, command: &str) -> Result<Vec<CoreEvent>> {
        let events = match command {
            "" => Vec::new(),
            "logout" | "pause" | "p" => self.engine.on_manual_logout_requested(),
            "quit" | "q" | "exit" => self.engine.on_window_close_requested(),
            other => {
                self.shell
                    .unknown_command(other)
                    .context("Failed to write to terminal")?;
                Vec::new()
            }
        };
        Ok(events)
    }

    /// Render events; a failed logout blocks until the user acknowledges it
    async fn present(
        &mut self,
        events: &[CoreEvent],
        commands: &mut mpsc::UnboundedReceiver<String>,
        stdin_open: bool,
    ) -> Result<()> {
        self.shell
            .render(events)
            .context("Failed to write to terminal")?;

        let logout_failed = events
            .iter()
            .any(|e| matches!(e, CoreEvent::LogoutFailed { .. }));
        if logout_failed && stdin_open {
            self.shell
                .press_enter_prompt()
                .context("Failed to write to terminal")?;
            commands.recv().await;
        } else if logout_failed {
            warn!("Stdin is closed, logout failure notice cannot be acknowledged");
            self.shell
                .notice_unacknowledged()
                .context("Failed to write to terminal")?;
            tokio::time::sleep(NOTICE_HOLD).await;
        }
        Ok(())
    }
}

/// Forward stdin lines from a dedicated thread. The thread is left detached
/// so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    rx
}

fn print_status(store: Arc<dyn Store>) {
    let ledger = DayLedger::load(store);
    let day = current_day_key(daylimit_util::now());
    let session = Session::new(day.clone(), ledger.used_seconds(&day), ledger.daily_limit());

    println!("Day:         {}", day);
    println!("Daily limit: {}", format_hms(session.daily_limit));
    println!("Used:        {}", format_hms(session.used_today));
    println!("Remaining:   {}", format_hms(session.remaining()));
}

fn print_history(store: &dyn Store, limit: usize) -> Result<()> {
    let entries = store
        .recent_activity(limit)
        .context("Failed to read activity log")?;

    if entries.is_empty() {
        println!("No activity recorded.");
    }
    for entry in entries {
        println!("{}", entry);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout belongs to the shell
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "daylimit starting");

    if is_mock_time_active() {
        warn!("Mock time is active, day boundaries follow the shifted clock");
    }

    let policy = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| policy.service.data_dir.clone());

    let json_store = JsonStore::open(&data_dir, policy.limits.default_daily_limit_secs)
        .with_context(|| format!("Failed to open data directory {:?}", data_dir))?;

    info!(
        config_path = %args.config.display(),
        state_path = %json_store.state_path().display(),
        activity_log = %json_store.activity_log_path().display(),
        "Store initialized"
    );

    let store: Arc<dyn Store> = Arc::new(json_store);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => Service::new(&args, &policy, store).run().await,
        Command::Status => {
            print_status(store);
            Ok(())
        }
        Command::History { limit } => print_history(store.as_ref(), limit),
    }
}
