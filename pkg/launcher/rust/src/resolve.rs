// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::{JAVA_HOME_VAR, PATH_VAR};
use crate::errors::{Error, Result};
use crate::platform::PlatformProfile;
use log::debug;
use std::path::Path;

/// Inputs to executable resolution, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaEnv {
    /// Java home given explicitly (e.g. `--java-home`).
    pub java_home_override: Option<String>,
    /// Value of `JAVA_HOME`.
    pub java_home: Option<String>,
    /// Value of `PATH`.
    pub search_path: Option<String>,
}

impl JavaEnv {
    /// Snapshot `JAVA_HOME` and `PATH` from the process environment.
    pub fn from_process_env() -> Self {
        Self {
            java_home_override: None,
            java_home: std::env::var(JAVA_HOME_VAR).ok().filter(|v| !v.is_empty()),
            search_path: std::env::var(PATH_VAR).ok(),
        }
    }
}

/// Locates the JDK tools the launcher runs.
pub trait ExecutableResolver: Send + Sync {
    /// Return the path of `binary` (`java`, `jar`) or
    /// [`Error::EnvironmentResolution`] when it cannot be found.
    fn resolve(&self, binary: &str) -> Result<String>;
}

/// Resolution against a [`JavaEnv`]: explicit Java home, then `JAVA_HOME`,
/// then a `PATH` search.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    env: JavaEnv,
    profile: PlatformProfile,
}

impl SystemResolver {
    pub fn new(env: JavaEnv, profile: PlatformProfile) -> Self {
        Self { env, profile }
    }
}

impl ExecutableResolver for SystemResolver {
    fn resolve(&self, binary: &str) -> Result<String> {
        let name = self.profile.executable_name(binary);

        let homes = [
            ("java home override", self.env.java_home_override.as_deref()),
            (JAVA_HOME_VAR, self.env.java_home.as_deref()),
        ];
        // A configured Java home is trusted as-is; a broken one fails at spawn time.
        if let Some((source, home)) = homes
            .into_iter()
            .find_map(|(source, home)| home.map(|h| (source, h)))
        {
            let path = self.profile.join(&[home, "bin", name.as_str()]);
            debug!("resolved {binary} from {source}: {path}");
            return Ok(path);
        }

        if let Some(path) = self
            .env
            .search_path
            .as_deref()
            .and_then(|search_path| which(&name, search_path, self.profile))
        {
            debug!("resolved {binary} from {PATH_VAR}: {path}");
            return Ok(path);
        }

        Err(Error::EnvironmentResolution {
            binary: binary.to_string(),
        })
    }
}

/// Find `program` in `search_path`. A program that already contains a path
/// separator is only checked in place.
pub fn which(program: &str, search_path: &str, profile: PlatformProfile) -> Option<String> {
    if program.contains(profile.path_separator()) {
        return is_executable(Path::new(program)).then(|| program.to_string());
    }
    profile
        .split_list(search_path)
        .into_iter()
        .map(|dir| profile.join(&[dir.as_str(), program]))
        .find(|candidate| is_executable(Path::new(candidate)))
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
