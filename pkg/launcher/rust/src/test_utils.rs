// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Stand-in implementations of the launcher's capability traits.

use crate::config::Layout;
use crate::errors::{Error, Result};
use crate::pid::ProcessTable;
use crate::resolve::ExecutableResolver;
use crate::spawn::{ProcessSpawner, SpawnRequest};
use crate::webapp::WebAppResolver;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Write an executable script named `name` into `dir`.
pub fn write_executable(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// Resolves every binary to `{prefix}{binary}`, or fails for all of them.
pub struct StubResolver {
    prefix: Option<String>,
}

impl StubResolver {
    pub fn found(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
        }
    }

    pub fn missing() -> Self {
        Self { prefix: None }
    }
}

impl ExecutableResolver for StubResolver {
    fn resolve(&self, binary: &str) -> Result<String> {
        match self.prefix {
            Some(ref prefix) => Ok(format!("{prefix}{binary}")),
            None => Err(Error::EnvironmentResolution {
                binary: binary.to_string(),
            }),
        }
    }
}

/// Records every request and hands out increasing PIDs.
#[derive(Clone)]
pub struct RecordingSpawner {
    spawned: Arc<Mutex<Vec<SpawnRequest>>>,
    ran: Arc<Mutex<Vec<SpawnRequest>>>,
    next_pid: Arc<Mutex<u32>>,
    fail_runs: bool,
}

impl RecordingSpawner {
    pub fn new(first_pid: u32) -> Self {
        Self {
            spawned: Arc::new(Mutex::new(Vec::new())),
            ran: Arc::new(Mutex::new(Vec::new())),
            next_pid: Arc::new(Mutex::new(first_pid)),
            fail_runs: false,
        }
    }

    /// Every `run` call fails as if the tool exited non-zero.
    pub fn failing_runs(mut self) -> Self {
        self.fail_runs = true;
        self
    }

    pub fn spawned(&self) -> Vec<SpawnRequest> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn ran(&self) -> Vec<SpawnRequest> {
        self.ran.lock().unwrap().clone()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, request: &SpawnRequest) -> Result<u32> {
        self.spawned.lock().unwrap().push(request.clone());
        let mut next = self.next_pid.lock().unwrap();
        let pid = *next;
        *next += 1;
        Ok(pid)
    }

    fn run(&self, request: &SpawnRequest) -> Result<()> {
        self.ran.lock().unwrap().push(request.clone());
        if self.fail_runs {
            return Err(Error::LaunchExit {
                program: request.program.clone(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCall {
    SignalProbe(i32),
    TaskList(String),
    SignalTerminate(i32),
    TaskKill(String),
}

/// Process table backed by a set of live PIDs. Terminating a PID removes it
/// unless the table was built with `stubborn`.
#[derive(Clone)]
pub struct ScriptedProcessTable {
    alive: Arc<Mutex<HashSet<u32>>>,
    calls: Arc<Mutex<Vec<ProbeCall>>>,
    fail: bool,
    stubborn: bool,
}

impl ScriptedProcessTable {
    pub fn alive(pids: &[u32]) -> Self {
        Self {
            alive: Arc::new(Mutex::new(pids.iter().copied().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            stubborn: false,
        }
    }

    /// Every query fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::alive(&[])
        }
    }

    /// Processes ignore termination requests.
    pub fn stubborn(pids: &[u32]) -> Self {
        Self {
            stubborn: true,
            ..Self::alive(pids)
        }
    }

    pub fn calls(&self) -> Vec<ProbeCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ProbeCall) -> io::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(io::Error::other("scripted failure"));
        }
        Ok(())
    }

    fn contains(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains(&pid)
    }

    fn kill(&self, pid: u32) {
        if !self.stubborn {
            self.alive.lock().unwrap().remove(&pid);
        }
    }
}

impl ProcessTable for ScriptedProcessTable {
    fn signal_probe(&self, pid: i32) -> io::Result<bool> {
        self.record(ProbeCall::SignalProbe(pid))?;
        Ok(u32::try_from(pid).is_ok_and(|p| self.contains(p)))
    }

    fn task_list(&self, pid: &str) -> io::Result<bool> {
        self.record(ProbeCall::TaskList(pid.to_string()))?;
        Ok(pid.parse().is_ok_and(|p| self.contains(p)))
    }

    fn signal_terminate(&self, pid: i32) -> io::Result<()> {
        self.record(ProbeCall::SignalTerminate(pid))?;
        if let Ok(p) = u32::try_from(pid) {
            self.kill(p);
        }
        Ok(())
    }

    fn task_kill(&self, pid: &str) -> io::Result<()> {
        self.record(ProbeCall::TaskKill(pid.to_string()))?;
        if let Ok(p) = pid.parse() {
            self.kill(p);
        }
        Ok(())
    }
}

/// Web application resolver that succeeds or fails without touching disk.
#[derive(Clone)]
pub struct StubWebApp {
    ok: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubWebApp {
    pub fn expanded() -> Self {
        Self {
            ok: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unresolvable() -> Self {
        Self {
            ok: false,
            ..Self::expanded()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl WebAppResolver for StubWebApp {
    fn expand(&self, layout: &Layout, app: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{app}", layout.web_app_dir));
        if self.ok {
            Ok(())
        } else {
            Err(Error::Resolution {
                context: format!("no {app} web application under {}", layout.web_app_dir),
            })
        }
    }
}
