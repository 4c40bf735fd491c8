// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::env::load_conf_environment;
use crate::errors::{Error, Result};
use crate::platform::PlatformProfile;
use crate::resolve::JavaEnv;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

pub const ATLAS_HOME_VAR: &str = "ATLAS_HOME_DIR";
pub const ATLAS_CONF_VAR: &str = "ATLAS_CONF";
pub const ATLAS_LOG_VAR: &str = "ATLAS_LOG_DIR";
pub const ATLAS_PID_VAR: &str = "ATLAS_PID_DIR";
pub const ATLAS_DATA_VAR: &str = "ATLAS_DATA_DIR";
pub const ATLAS_WEBAPP_VAR: &str = "ATLAS_EXPANDED_WEBAPP_DIR";
pub const ATLAS_SERVER_HEAP_VAR: &str = "ATLAS_SERVER_HEAP";
pub const ATLAS_SERVER_OPTS_VAR: &str = "ATLAS_SERVER_OPTS";
pub const ATLAS_OPTS_VAR: &str = "ATLAS_OPTS";
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";
pub const PATH_VAR: &str = "PATH";

pub const DEFAULT_SERVER_HEAP: &str = "-Xmx1024m -XX:MaxPermSize=512m";
pub const DEFAULT_JVM_OPTS: &str =
    "-Dlog4j.configuration=atlas-log4j.xml -Djava.net.preferIPv4Stack=true";
pub const PID_FILE_NAME: &str = "atlas.pid";

/// Snapshot of environment variables. Resolution only ever reads from a
/// snapshot; the launcher never writes to its own process environment.
pub type EnvVars = HashMap<String, String>;

fn non_empty<'a>(env: &'a EnvVars, key: &str) -> Option<&'a str> {
    env.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Directory locations of an Atlas installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub home: String,
    pub conf_dir: String,
    pub log_dir: String,
    pub data_dir: String,
    /// Parent of the expanded web application (`{home}/server/webapp`).
    pub web_app_dir: String,
    pub pid_file: String,
}

impl Layout {
    /// Default layout rooted at `home`.
    pub fn new(home: &str, profile: PlatformProfile) -> Self {
        Self::from_env(home, &EnvVars::new(), profile)
    }

    /// Layout rooted at `home` with `ATLAS_*` directory overrides from `env`.
    pub fn from_env(home: &str, env: &EnvVars, profile: PlatformProfile) -> Self {
        let dir = |var: &str, default: &[&str]| {
            non_empty(env, var)
                .map(String::from)
                .unwrap_or_else(|| profile.join(default))
        };
        let log_dir = dir(ATLAS_LOG_VAR, &[home, "logs"]);
        let pid_dir = non_empty(env, ATLAS_PID_VAR)
            .map(String::from)
            .unwrap_or_else(|| log_dir.clone());
        Self {
            home: home.to_string(),
            conf_dir: dir(ATLAS_CONF_VAR, &[home, "conf"]),
            data_dir: dir(ATLAS_DATA_VAR, &[home, "data"]),
            web_app_dir: dir(ATLAS_WEBAPP_VAR, &[home, "server", "webapp"]),
            pid_file: profile.join(&[pid_dir.as_str(), PID_FILE_NAME]),
            log_dir,
        }
    }

    /// Directories that must exist before the server starts.
    pub fn required_dirs(&self) -> [&str; 3] {
        [
            self.conf_dir.as_str(),
            self.log_dir.as_str(),
            self.data_dir.as_str(),
        ]
    }
}

/// Heap and JVM option strings, split on whitespace when building the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmSettings {
    pub heap_opts: String,
    pub server_opts: Option<String>,
    pub jvm_opts: String,
}

impl Default for JvmSettings {
    fn default() -> Self {
        Self {
            heap_opts: DEFAULT_SERVER_HEAP.to_string(),
            server_opts: None,
            jvm_opts: DEFAULT_JVM_OPTS.to_string(),
        }
    }
}

impl JvmSettings {
    pub fn from_env(env: &EnvVars) -> Self {
        let defaults = Self::default();
        Self {
            heap_opts: env
                .get(ATLAS_SERVER_HEAP_VAR)
                .cloned()
                .unwrap_or(defaults.heap_opts),
            server_opts: non_empty(env, ATLAS_SERVER_OPTS_VAR).map(String::from),
            jvm_opts: env.get(ATLAS_OPTS_VAR).cloned().unwrap_or(defaults.jvm_opts),
        }
    }

    /// Heap options, then server options, then JVM options.
    pub fn options(&self) -> Vec<String> {
        [
            Some(self.heap_opts.as_str()),
            self.server_opts.as_deref(),
            Some(self.jvm_opts.as_str()),
        ]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .map(String::from)
        .collect()
    }
}

/// Values given explicitly on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub home: Option<String>,
    pub java_home: Option<String>,
}

/// Fully resolved launcher configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: PlatformProfile,
    pub layout: Layout,
    pub jvm: JvmSettings,
    pub java: JavaEnv,
    /// Variables from the environment file, passed on to spawned processes.
    pub child_env: Vec<(String, String)>,
}

impl Settings {
    /// Resolve settings from the command line, the inherited environment and
    /// `{conf}/atlas-env.sh`.
    pub fn load(
        overrides: &Overrides,
        inherited: EnvVars,
        profile: PlatformProfile,
    ) -> Result<Self> {
        let home = match overrides
            .home
            .clone()
            .or_else(|| non_empty(&inherited, ATLAS_HOME_VAR).map(String::from))
        {
            Some(home) => home,
            None => default_home()?,
        };
        let conf_dir = non_empty(&inherited, ATLAS_CONF_VAR)
            .map(String::from)
            .unwrap_or_else(|| profile.join(&[home.as_str(), "conf"]));
        let file_vars = load_conf_environment(Path::new(&conf_dir))?;
        Ok(Self::from_env(home, overrides, inherited, file_vars, profile))
    }

    /// Merge `file_vars` over `inherited` and derive the settings from the result.
    pub fn from_env(
        home: String,
        overrides: &Overrides,
        mut inherited: EnvVars,
        file_vars: Vec<(String, String)>,
        profile: PlatformProfile,
    ) -> Self {
        for (k, v) in &file_vars {
            inherited.insert(k.clone(), v.clone());
        }
        let env = inherited;
        let layout = Layout::from_env(&home, &env, profile);
        debug!("resolved layout: {layout:?}");

        Self {
            profile,
            jvm: JvmSettings::from_env(&env),
            java: JavaEnv {
                java_home_override: overrides.java_home.clone(),
                java_home: non_empty(&env, JAVA_HOME_VAR).map(String::from),
                search_path: env.get(PATH_VAR).cloned(),
            },
            layout,
            child_env: file_vars,
        }
    }
}

/// Installation root inferred from the binary location (`{home}/bin/atlas-launcher`).
fn default_home() -> Result<String> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::io("cannot determine Atlas home from the executable path", e))?;
    exe.parent()
        .and_then(Path::parent)
        .map(|p| p.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::io(
                format!("cannot determine Atlas home from {}", exe.display()),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            )
        })
}
