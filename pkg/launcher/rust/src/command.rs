// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Construction of the server command: class path, JVM options and
//! application arguments. Everything here is a pure function of its inputs.

use crate::config::{JvmSettings, Layout};
use crate::errors::{Error, Result};
use crate::platform::PlatformProfile;

pub const ATLAS_MAIN_CLASS: &str = "org.apache.atlas.Atlas";
/// Name of the web application under `{home}/server/webapp`.
pub const ATLAS_APP_NAME: &str = "atlas";
pub const ATLAS_LOG_FILE: &str = "application.log";
const TITAN_JAR: &str = "atlas-titan-${project.version}.jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub entry_point_class: String,
    pub application_args: Vec<String>,
    pub class_path: String,
    pub jvm_options: Vec<String>,
    pub log_directory: String,
}

#[derive(Debug, Clone)]
pub struct CommandBuilder {
    profile: PlatformProfile,
    jvm: JvmSettings,
}

impl CommandBuilder {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            jvm: JvmSettings::default(),
        }
    }

    pub fn with_jvm(mut self, jvm: JvmSettings) -> Self {
        self.jvm = jvm;
        self
    }

    /// Launch spec for the default layout under `home` with default JVM settings.
    pub fn build(home: &str, app: &str, profile: PlatformProfile) -> Result<LaunchSpec> {
        Self::new(profile).build_with(&Layout::new(home, profile), app, &[])
    }

    /// Launch spec for `app` in `layout`. `extra_args` are appended to the
    /// application arguments.
    pub fn build_with(
        &self,
        layout: &Layout,
        app: &str,
        extra_args: &[String],
    ) -> Result<LaunchSpec> {
        if app.trim().is_empty() {
            return Err(Error::Resolution {
                context: "web application name is empty".to_string(),
            });
        }
        let p = self.profile;
        let app_dir = p.join(&[layout.web_app_dir.as_str(), app]);
        let web_inf = p.join(&[app_dir.as_str(), "WEB-INF"]);

        let class_path = p.join_list(&[
            layout.conf_dir.clone(),
            p.join(&[web_inf.as_str(), "classes"]),
            p.join(&[web_inf.as_str(), "lib", TITAN_JAR]),
            p.join(&[web_inf.as_str(), "lib", "*"]),
            p.join(&[layout.home.as_str(), "libext", "*"]),
            p.join(&[layout.home.as_str(), "hbase", "conf"]),
        ]);

        let mut jvm_options = vec![
            format!("-Datlas.log.dir={}", layout.log_dir),
            format!("-Datlas.log.file={ATLAS_LOG_FILE}"),
            format!("-Datlas.home={}", layout.home),
            format!("-Datlas.conf={}", layout.conf_dir),
        ];
        jvm_options.extend(self.jvm.options());

        let mut application_args = vec!["-app".to_string(), app_dir];
        application_args.extend(extra_args.iter().cloned());

        Ok(LaunchSpec {
            entry_point_class: ATLAS_MAIN_CLASS.to_string(),
            application_args,
            class_path,
            jvm_options,
            log_directory: layout.log_dir.clone(),
        })
    }
}
