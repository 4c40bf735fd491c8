// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{Error, Result};
use crate::platform::PlatformProfile;
use log::{debug, info};
use std::fs::{DirBuilder, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// A launched server and the file its PID was written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRecord {
    pub pid: u32,
    pub pid_file: String,
}

/// Operating system process table queries.
///
/// POSIX and Windows queries take the PID in different forms: the signal
/// probe receives the numeric PID, the tasklist query receives it as text.
pub trait ProcessTable: Send + Sync {
    /// Null-signal probe. EPERM counts as "exists".
    fn signal_probe(&self, pid: i32) -> io::Result<bool>;

    /// `tasklist /FI "PID eq <pid>"` query.
    fn task_list(&self, pid: &str) -> io::Result<bool>;

    /// SIGTERM.
    fn signal_terminate(&self, pid: i32) -> io::Result<()>;

    /// `taskkill /F /PID <pid>`.
    fn task_kill(&self, pid: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn signal_probe(&self, pid: i32) -> io::Result<bool> {
        #[cfg(unix)]
        {
            use nix::errno::Errno;
            use nix::sys::signal;
            use nix::unistd::Pid;

            match signal::kill(Pid::from_raw(pid), None) {
                Ok(()) => Ok(true),
                Err(Errno::EPERM) => Ok(true),
                Err(Errno::ESRCH) => Ok(false),
                Err(e) => Err(e.into()),
            }
        }

        #[cfg(not(unix))]
        {
            Err(io::Error::new(
                ErrorKind::Unsupported,
                format!("signal probe of pid {pid} is not available on this platform"),
            ))
        }
    }

    fn task_list(&self, pid: &str) -> io::Result<bool> {
        let output = Command::new("tasklist")
            .args(["/FI", &format!("PID eq {pid}")])
            .output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "tasklist exited with {}",
                output.status
            )));
        }
        Ok(tasklist_lists_pid(
            &String::from_utf8_lossy(&output.stdout),
            pid,
        ))
    }

    fn signal_terminate(&self, pid: i32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            signal::kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(io::Error::from)
        }

        #[cfg(not(unix))]
        {
            Err(io::Error::new(
                ErrorKind::Unsupported,
                format!("cannot signal pid {pid} on this platform"),
            ))
        }
    }

    fn task_kill(&self, pid: &str) -> io::Result<()> {
        let status = Command::new("taskkill").args(["/F", "/PID", pid]).status()?;
        if !status.success() {
            return Err(io::Error::other(format!("taskkill exited with {status}")));
        }
        Ok(())
    }
}

/// True if any token of tasklist output (table or CSV format) is exactly `pid`.
pub fn tasklist_lists_pid(output: &str, pid: &str) -> bool {
    output
        .split(|c: char| c.is_whitespace() || c == ',')
        .any(|token| token.trim_matches('"') == pid)
}

/// PID file persistence plus liveness checks routed by platform profile.
#[derive(Clone)]
pub struct PidLifecycle {
    profile: PlatformProfile,
    table: Arc<dyn ProcessTable>,
}

impl PidLifecycle {
    pub fn new(profile: PlatformProfile, table: Arc<dyn ProcessTable>) -> Self {
        Self { profile, table }
    }

    /// Write `pid` to `path`, replacing previous content. Parent directories
    /// are created as needed.
    pub fn write_pid(&self, path: &str, pid: u32) -> Result<PidRecord> {
        let pid_err = |source| Error::PidFile {
            path: path.to_string(),
            source,
        };
        let file_path = Path::new(path);
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            DirBuilder::new()
                .recursive(true)
                .create(parent)
                .map_err(pid_err)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).truncate(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let mut file = options.open(file_path).map_err(pid_err)?;
        file.write_all(pid.to_string().as_bytes()).map_err(pid_err)?;

        info!("Created PID file at {path} (pid={pid})");
        Ok(PidRecord {
            pid,
            pid_file: path.to_string(),
        })
    }

    /// PID stored at `path`. A missing or blank file means no PID.
    pub fn read_pid(&self, path: &str) -> Result<Option<u32>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::PidFile {
                    path: path.to_string(),
                    source,
                });
            }
        };
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some).map_err(|_| Error::PidFile {
            path: path.to_string(),
            source: io::Error::new(
                ErrorKind::InvalidData,
                format!("not a process id: {trimmed:?}"),
            ),
        })
    }

    pub fn remove_pid(&self, path: &str) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!("Removed PID file at {path}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::PidFile {
                path: path.to_string(),
                source,
            }),
        }
    }

    /// Whether a process with `pid` exists.
    pub fn process_exists(&self, pid: u32) -> Result<bool> {
        // kill(0, 0) would probe our own process group.
        if pid == 0 {
            return Ok(false);
        }
        let probe_err = |source| Error::Probe {
            pid: pid.to_string(),
            source,
        };
        let exists = match self.profile {
            PlatformProfile::Posix => self
                .table
                .signal_probe(posix_pid(pid)?)
                .map_err(probe_err)?,
            PlatformProfile::Windows => self
                .table
                .task_list(&pid.to_string())
                .map_err(probe_err)?,
        };
        debug!("pid {pid} exists: {exists}");
        Ok(exists)
    }

    pub fn terminate(&self, pid: u32) -> Result<()> {
        let probe_err = |source| Error::Probe {
            pid: pid.to_string(),
            source,
        };
        match self.profile {
            PlatformProfile::Posix => {
                info!("sending SIGTERM to pid {pid}");
                self.table
                    .signal_terminate(posix_pid(pid)?)
                    .map_err(probe_err)
            }
            PlatformProfile::Windows => {
                info!("terminating pid {pid}");
                self.table.task_kill(&pid.to_string()).map_err(probe_err)
            }
        }
    }
}

fn posix_pid(pid: u32) -> Result<i32> {
    i32::try_from(pid).map_err(|_| Error::Probe {
        pid: pid.to_string(),
        source: io::Error::new(ErrorKind::InvalidInput, "pid out of range"),
    })
}
