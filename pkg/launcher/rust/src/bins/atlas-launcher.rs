// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use atlas_launcher::config::EnvVars;
use atlas_launcher::readiness::{ServerAddress, wait_for_startup};
use atlas_launcher::{Overrides, PlatformProfile, Server, ServerStatus, Settings, StopOutcome};
use clap::{Parser, Subcommand};
use launcher_log::Logger;
use log::{LevelFilter, info, warn};

const LAUNCHER_LOG_FILE: &str = "launcher.log";
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Start, stop and query an Apache Atlas server
#[derive(Parser, Debug)]
#[command(name = "atlas-launcher", version)]
struct Cli {
    /// Atlas installation directory (default: ATLAS_HOME_DIR, then the parent
    /// of the directory holding this binary)
    #[arg(long, global = true)]
    home: Option<String>,

    /// Java installation to use instead of JAVA_HOME and PATH
    #[arg(long, global = true)]
    java_home: Option<String>,

    #[arg(
        long,
        global = true,
        env = "ATLAS_LAUNCHER_LOG_LEVEL",
        default_value = "info"
    )]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the server in the background
    Start {
        /// Seconds to wait for the server port to accept connections (0 disables)
        #[arg(long, default_value = "300")]
        wait_timeout: u64,

        /// Extra arguments passed to the server
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Stop a running server
    Stop {
        /// Seconds to wait for the server to exit
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Report whether the server is running
    Status,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let inherited: EnvVars = std::env::vars().collect();
    let overrides = Overrides {
        home: cli.home.clone(),
        java_home: cli.java_home.clone(),
    };
    let settings = Settings::load(&overrides, inherited, PlatformProfile::current())
        .context("failed to load launcher configuration")?;

    init_logging(cli.log_level, &settings.layout.log_dir)?;
    info!(
        "atlas-launcher {} (home={}, platform={})",
        env!("CARGO_PKG_VERSION"),
        settings.layout.home,
        settings.profile
    );

    let server = Server::system(settings);
    match cli.command {
        Command::Start { wait_timeout, args } => start(&server, wait_timeout, &args),
        Command::Stop { timeout } => stop(&server, timeout),
        Command::Status => status(&server),
    }
}

fn init_logging(level: LevelFilter, log_dir: &str) -> Result<()> {
    let path = Path::new(log_dir).join(LAUNCHER_LOG_FILE);
    let logger = Logger::new("ATLAS-LAUNCHER", level);
    let (logger, file_error) = match logger.with_file(&path) {
        Ok(logger) => (logger, None),
        Err(e) => (Logger::new("ATLAS-LAUNCHER", level), Some(e)),
    };
    launcher_log::init(logger).context("failed to install logger")?;
    if let Some(e) = file_error {
        warn!("not writing to {}: {e}", path.display());
    }
    Ok(())
}

fn start(server: &Server, wait_timeout: u64, args: &[String]) -> Result<ExitCode> {
    let record = server.start(args).context("failed to start Atlas server")?;
    info!("pid file: {}", record.pid_file);

    if wait_timeout > 0 {
        let address = ServerAddress::from_conf_dir(&server.settings().layout.conf_dir)
            .context("failed to read server address")?;
        wait_for_startup(&address, Duration::from_secs(wait_timeout), POLL_INTERVAL);
    }
    Ok(ExitCode::SUCCESS)
}

fn stop(server: &Server, timeout: u64) -> Result<ExitCode> {
    let outcome = server
        .stop(Duration::from_secs(timeout), POLL_INTERVAL)
        .context("failed to stop Atlas server")?;
    match outcome {
        StopOutcome::Stopped(pid) => info!("Atlas server (pid {pid}) stopped"),
        StopOutcome::StillRunning(pid) => {
            warn!("Atlas server (pid {pid}) did not exit within {timeout}s")
        }
        StopOutcome::Stale(_) | StopOutcome::NotRunning => {}
    }
    Ok(ExitCode::SUCCESS)
}

/// Exit codes follow LSB `status`: 0 running, 1 dead with pid file, 3 not running.
fn status(server: &Server) -> Result<ExitCode> {
    let status = server.status().context("failed to query Atlas server")?;
    let code = match status {
        ServerStatus::Running(pid) => {
            println!("Atlas server is running (pid {pid})");
            0
        }
        ServerStatus::Stale(pid) => {
            println!("Atlas server is not running (stale pid {pid})");
            1
        }
        ServerStatus::NotRunning => {
            println!("Atlas server is not running");
            3
        }
    };
    Ok(ExitCode::from(code))
}
