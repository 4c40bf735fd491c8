// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{Error, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use time::macros::format_description;

/// How long a freshly spawned process is watched for an immediate failure.
const STARTUP_SETTLE: Duration = Duration::from_millis(500);
const STARTUP_POLL: Duration = Duration::from_millis(50);

/// Exact argument vector and surroundings of a process to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<String>,
    /// When set, stdout and stderr are captured in timestamped files here.
    pub log_dir: Option<String>,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl SpawnRequest {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            log_dir: None,
            env: Vec::new(),
        }
    }

    /// Program followed by its arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// Starts operating system processes.
pub trait ProcessSpawner: Send + Sync {
    /// Start the process and return its PID once it is confirmed running.
    /// A non-zero exit right after the start is an error. Does not wait for
    /// completion.
    fn spawn(&self, request: &SpawnRequest) -> Result<u32>;

    /// Run the process to completion. A non-zero exit is an error.
    fn run(&self, request: &SpawnRequest) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl SystemSpawner {
    fn command(&self, request: &SpawnRequest) -> Result<Command> {
        debug!("executing: {:?}", request.command_line());
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);

        for (k, v) in &request.env {
            cmd.env(k, v);
        }

        if let Some(ref dir) = request.working_dir {
            cmd.current_dir(dir);
        }

        if let Some(ref log_dir) = request.log_dir {
            let stem = capture_file_stem(OffsetDateTime::now_utc());
            cmd.stdout(capture_file(log_dir, &format!("{stem}.out"))?);
            cmd.stderr(capture_file(log_dir, &format!("{stem}.err"))?);
        }
        Ok(cmd)
    }
}

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, request: &SpawnRequest) -> Result<u32> {
        let mut child = self
            .command(request)?
            .spawn()
            .map_err(|source| Error::Launch {
                program: request.program.clone(),
                source,
            })?;
        let pid = child.id();
        info!("spawned (pid={pid}, cmd={})", request.program);

        // A process that dies within the settle period never really started.
        let deadline = Instant::now() + STARTUP_SETTLE;
        loop {
            match child.try_wait() {
                Ok(Some(status)) if !status.success() => {
                    warn!("pid {pid} exited during startup with {status}");
                    return Err(Error::LaunchExit {
                        program: request.program.clone(),
                        status: status.to_string(),
                    });
                }
                Ok(Some(_)) => break,
                Ok(None) => {}
                Err(source) => {
                    return Err(Error::Launch {
                        program: request.program.clone(),
                        source,
                    });
                }
            }
            if Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(STARTUP_POLL);
        }
        Ok(pid)
    }

    fn run(&self, request: &SpawnRequest) -> Result<()> {
        let status = self
            .command(request)?
            .status()
            .map_err(|source| Error::Launch {
                program: request.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(Error::LaunchExit {
                program: request.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// `atlas.YYYYMMDD-HHMMSS`, shared by the `.out` and `.err` capture files.
pub fn capture_file_stem(now: OffsetDateTime) -> String {
    let stamp = now
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    format!("atlas.{stamp}")
}

fn capture_file(log_dir: &str, name: &str) -> Result<Stdio> {
    let path = Path::new(log_dir).join(name);
    let file = File::create(&path)
        .map_err(|e| Error::io(format!("creating {}", path.display()), e))?;
    Ok(Stdio::from(file))
}
