// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::Layout;
use crate::errors::{Error, Result};
use crate::launcher::ProcessLauncher;
use crate::platform::PlatformProfile;
use log::{debug, info};
use std::fs::DirBuilder;
use std::path::Path;

/// Makes the web application available as an expanded directory under
/// `layout.web_app_dir`.
pub trait WebAppResolver: Send + Sync {
    fn expand(&self, layout: &Layout, app: &str) -> Result<()>;
}

/// Extracts `{web_app_dir}/{app}.war` with `jar -xf` unless
/// `{web_app_dir}/{app}/WEB-INF` already exists.
pub struct WarExpander {
    launcher: ProcessLauncher,
    profile: PlatformProfile,
}

impl WarExpander {
    pub fn new(launcher: ProcessLauncher, profile: PlatformProfile) -> Self {
        Self { launcher, profile }
    }
}

impl WebAppResolver for WarExpander {
    fn expand(&self, layout: &Layout, app: &str) -> Result<()> {
        let p = self.profile;
        let app_dir = p.join(&[layout.web_app_dir.as_str(), app]);
        let web_inf = p.join(&[app_dir.as_str(), "WEB-INF"]);
        if Path::new(&web_inf).is_dir() {
            debug!("web application already expanded at {app_dir}");
            return Ok(());
        }

        let war = p.join(&[layout.web_app_dir.as_str(), &format!("{app}.war")]);
        if !Path::new(&war).is_file() {
            return Err(Error::Resolution {
                context: format!("{web_inf} does not exist and no archive was found at {war}"),
            });
        }

        DirBuilder::new()
            .recursive(true)
            .create(&app_dir)
            .map_err(|e| Error::io(format!("creating {app_dir}"), e))?;

        info!("expanding {war} into {app_dir}");
        self.launcher.jar(&war, &app_dir).map_err(|e| match e {
            Error::EnvironmentResolution { .. } => e,
            other => Error::Resolution {
                context: format!("extracting {war}: {other}"),
            },
        })
    }
}
