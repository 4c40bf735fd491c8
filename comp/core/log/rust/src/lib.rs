// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! `log` backend for the launcher binaries.
//!
//! Lines follow the agent format:
//! `2026-01-02 15:04:05 UTC | ATLAS-LAUNCHER | INFO | (src/server.rs:42 in atlas_launcher::server) | message`
//! and go to stderr, plus an optional append-only file.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use time::OffsetDateTime;
use time::macros::format_description;

pub struct Logger {
    component: &'static str,
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(component: &'static str, level: LevelFilter) -> Self {
        Self {
            component,
            level,
            file: None,
        }
    }

    /// Also append every line to `path`, creating parent directories as needed.
    pub fn with_file(mut self, path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.file = Some(Mutex::new(file));
        Ok(self)
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

/// Current UTC time in the log line format.
pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
        ))
        .unwrap_or_else(|_| "0000-00-00 00:00:00 UTC".to_string())
}

pub fn format_line(component: &str, timestamp: &str, record: &Record<'_>) -> String {
    format!(
        "{timestamp} | {component} | {} | ({}:{} in {}) | {}",
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.module_path().unwrap_or("unknown"),
        record.args()
    )
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = format_line(self.component, &timestamp(), record);
        line.push('\n');

        let _ = io::stderr().lock().write_all(line.as_bytes());
        if let Some(ref file) = self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = f.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(ref file) = self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

/// Install `logger` as the global `log` backend.
pub fn init(logger: Logger) -> Result<(), SetLoggerError> {
    let level = logger.level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
