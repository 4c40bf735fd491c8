// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::cell::RefCell;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variables the launcher reads; cleared so the host cannot leak in.
const LAUNCHER_VARS: &[&str] = &[
    "ATLAS_HOME_DIR",
    "ATLAS_CONF",
    "ATLAS_LOG_DIR",
    "ATLAS_PID_DIR",
    "ATLAS_DATA_DIR",
    "ATLAS_EXPANDED_WEBAPP_DIR",
    "ATLAS_SERVER_HEAP",
    "ATLAS_SERVER_OPTS",
    "ATLAS_OPTS",
    "ATLAS_LAUNCHER_LOG_LEVEL",
];

/// A throwaway Atlas installation plus a fake JDK.
///
/// The fake `java` records its arguments to `java.args` and then sleeps, the
/// fake `jar` creates `WEB-INF` in its working directory.
pub struct AtlasHome {
    dir: TempDir,
    seen_pids: RefCell<Vec<u32>>,
}

impl AtlasHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = Self {
            dir,
            seen_pids: RefCell::new(Vec::new()),
        };
        std::fs::create_dir_all(home.path().join("conf")).unwrap();
        std::fs::create_dir_all(home.web_app_dir().join("atlas/WEB-INF/lib")).unwrap();

        let bin = home.java_home().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        write_script(
            &bin.join("java"),
            &format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > {}\nexec /bin/sleep 300\n",
                home.args_file().display()
            ),
        );
        write_script(&bin.join("jar"), "#!/bin/sh\nmkdir -p WEB-INF/lib\n");
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn java_home(&self) -> PathBuf {
        self.path().join("jdk")
    }

    pub fn web_app_dir(&self) -> PathBuf {
        self.path().join("server/webapp")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.path().join("logs/atlas.pid")
    }

    fn args_file(&self) -> PathBuf {
        self.path().join("java.args")
    }

    /// Command for the launcher binary with a clean environment pointing at
    /// this installation.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_atlas-launcher"));
        for var in LAUNCHER_VARS {
            cmd.env_remove(var);
        }
        cmd.arg("--home")
            .arg(self.path())
            .args(args)
            .env("JAVA_HOME", self.java_home())
            .env("PATH", "/usr/bin:/bin");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let output = self.command(args).output().unwrap();
        eprintln!(
            "[launcher {args:?}] status={}\n{}{}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// PID recorded in the PID file, if any.
    pub fn recorded_pid(&self) -> Option<u32> {
        let pid = std::fs::read_to_string(self.pid_file())
            .ok()?
            .trim()
            .parse()
            .ok()?;
        self.seen_pids.borrow_mut().push(pid);
        Some(pid)
    }

    /// Arguments the fake `java` was started with, once it has written them.
    pub fn wait_for_java_args(&self) -> Option<Vec<String>> {
        let deadline = Instant::now() + DEFAULT_TIMEOUT;
        loop {
            if let Ok(contents) = std::fs::read_to_string(self.args_file())
                && contents.ends_with('\n')
            {
                return Some(contents.lines().map(String::from).collect());
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for AtlasHome {
    fn drop(&mut self) {
        for &pid in self.seen_pids.borrow().iter() {
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
        }
    }
}

fn write_script(path: &Path, contents: &str) {
    std::fs::write(path, contents)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Check if a PID is still alive.
pub fn pid_is_alive(pid: u32) -> bool {
    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}
