// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! The `start`, `stop` and `status` operations on an Atlas installation.

use crate::command::{ATLAS_APP_NAME, CommandBuilder};
use crate::config::Settings;
use crate::errors::{Error, Result};
use crate::launcher::ProcessLauncher;
use crate::pid::{PidLifecycle, PidRecord, SystemProcessTable};
use crate::resolve::SystemResolver;
use crate::spawn::SystemSpawner;
use crate::webapp::{WarExpander, WebAppResolver};
use log::{error, info, warn};
use std::fs::DirBuilder;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Running(u32),
    /// The PID file names a process that no longer exists.
    Stale(u32),
    NotRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Stale(u32),
    Stopped(u32),
    /// Still alive when the shutdown timeout elapsed.
    StillRunning(u32),
}

pub struct Server {
    settings: Settings,
    launcher: ProcessLauncher,
    webapp: Arc<dyn WebAppResolver>,
    pids: PidLifecycle,
}

impl Server {
    pub fn new(
        settings: Settings,
        launcher: ProcessLauncher,
        webapp: Arc<dyn WebAppResolver>,
        pids: PidLifecycle,
    ) -> Self {
        Self {
            settings,
            launcher,
            webapp,
            pids,
        }
    }

    /// Server wired to the real filesystem, process table and JDK tools.
    pub fn system(settings: Settings) -> Self {
        let profile = settings.profile;
        let launcher = ProcessLauncher::new(
            Arc::new(SystemResolver::new(settings.java.clone(), profile)),
            Arc::new(SystemSpawner),
        )
        .with_env(settings.child_env.clone());
        let webapp = Arc::new(WarExpander::new(launcher.clone(), profile));
        let pids = PidLifecycle::new(profile, Arc::new(SystemProcessTable));
        Self::new(settings, launcher, webapp, pids)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start the server and record its PID. `extra_args` are passed to the
    /// server after `-app <dir>`.
    pub fn start(&self, extra_args: &[String]) -> Result<PidRecord> {
        let layout = &self.settings.layout;
        for dir in layout.required_dirs() {
            DirBuilder::new()
                .recursive(true)
                .create(dir)
                .map_err(|e| Error::io(format!("creating directory {dir}"), e))?;
        }

        match self.status()? {
            ServerStatus::Running(pid) => return Err(Error::AlreadyRunning { pid }),
            ServerStatus::Stale(pid) => {
                warn!("Atlas server process {pid} is no longer running, starting a new one");
            }
            ServerStatus::NotRunning => {}
        }

        self.webapp
            .expand(layout, ATLAS_APP_NAME)
            .map_err(|e| match e {
                Error::Resolution { .. } | Error::EnvironmentResolution { .. } => e,
                other => Error::Resolution {
                    context: other.to_string(),
                },
            })?;

        let spec = CommandBuilder::new(self.settings.profile)
            .with_jvm(self.settings.jvm.clone())
            .build_with(layout, ATLAS_APP_NAME, extra_args)?;
        let pid = self.launcher.launch(&spec)?;
        let record = match self.pids.write_pid(&layout.pid_file, pid) {
            Ok(record) => record,
            Err(e) => {
                error!("could not record pid {pid} in {}, terminating it", layout.pid_file);
                if let Err(kill_err) = self.pids.terminate(pid) {
                    warn!("failed to terminate pid {pid}: {kill_err}");
                }
                return Err(e);
            }
        };
        info!("Atlas server started with pid {pid}");
        Ok(record)
    }

    /// Terminate the recorded server and wait up to `timeout` for it to exit.
    /// The PID file is removed whatever the outcome.
    pub fn stop(&self, timeout: Duration, poll_interval: Duration) -> Result<StopOutcome> {
        let pid_file = &self.settings.layout.pid_file;
        let pid = match self.status()? {
            ServerStatus::NotRunning => {
                info!("Atlas server is not running (no pid file at {pid_file})");
                return Ok(StopOutcome::NotRunning);
            }
            ServerStatus::Stale(pid) => {
                warn!("Atlas server process {pid} is no longer running, removing stale pid file");
                self.pids.remove_pid(pid_file)?;
                return Ok(StopOutcome::Stale(pid));
            }
            ServerStatus::Running(pid) => pid,
        };

        self.pids.terminate(pid)?;
        let outcome = self.wait_for_shutdown(pid, timeout, poll_interval)?;
        self.pids.remove_pid(pid_file)?;
        Ok(outcome)
    }

    pub fn status(&self) -> Result<ServerStatus> {
        let Some(pid) = self.pids.read_pid(&self.settings.layout.pid_file)? else {
            return Ok(ServerStatus::NotRunning);
        };
        if self.pids.process_exists(pid)? {
            Ok(ServerStatus::Running(pid))
        } else {
            Ok(ServerStatus::Stale(pid))
        }
    }

    fn wait_for_shutdown(
        &self,
        pid: u32,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<StopOutcome> {
        let start = Instant::now();
        loop {
            if !self.pids.process_exists(pid)? {
                info!("Atlas server process {pid} exited");
                return Ok(StopOutcome::Stopped(pid));
            }
            if start.elapsed() >= timeout {
                warn!(
                    "Atlas server process {pid} still running after {}s",
                    timeout.as_secs()
                );
                return Ok(StopOutcome::StillRunning(pid));
            }
            std::thread::sleep(poll_interval);
        }
    }
}
