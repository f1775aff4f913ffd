//! pm0d — user-level process supervisor daemon.
//!
//! Owns the unit table, the watcher tasks that drive auto-restart, and
//! the RPC listener that `pm0` (the CLI) talks to. Not meant to be run
//! directly; the CLI starts it on demand.

use pm0_daemon::config::Config;
use pm0_daemon::lifecycle::{self, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("pm0d {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("pm0d {}", env!("CARGO_PKG_VERSION"));
                println!("User-level process supervisor daemon.");
                println!();
                println!("pm0d is normally started on demand by the `pm0` CLI and should");
                println!("not be invoked directly. It listens for RPC requests on");
                println!("127.0.0.1:7777 (override with PM0_DAEMON_ADDR).");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    rotate_log_if_needed(&config.log_path);
    let _log_guard = setup_logging(&config)?;

    info!("starting pm0d");

    let startup = match lifecycle::bootstrap(config).await {
        Ok(startup) => startup,
        Err(LifecycleError::LockFailed(_)) => {
            eprintln!("pm0d is already running for this data root");
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            return Err(e.into());
        }
    };

    let supervisor = startup.supervisor;
    tokio::spawn(pm0_daemon::rpc::serve(startup.listener, supervisor.clone()));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    println!("READY");
    info!("pm0d ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    lifecycle::terminate_all(&supervisor);
    info!("pm0d stopped");
    Ok(())
}

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate `daemon.log` if it has grown past [`MAX_LOG_SIZE`]. Best-effort:
/// failures are ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let Ok(metadata) = std::fs::metadata(log_path) else {
        return;
    };
    if metadata.len() < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let _ = std::fs::rename(format!("{log_str}.{i}"), format!("{log_str}.{}", i + 1));
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config.log_path.file_name().ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
