// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{Error, Result};
use log::debug;
use std::path::Path;

/// Name of the shell environment file shipped in the conf directory.
pub const ENV_FILE_NAME: &str = "atlas-env.sh";

/// Parse a shell-style environment file into key-value pairs.
/// Supports `KEY=VALUE`, `export KEY=VALUE`, `KEY="VALUE"`, `KEY='VALUE'`,
/// comments (#), and blank lines. Anything else is skipped.
pub fn parse_environment_file(path: &Path) -> Result<Vec<(String, String)>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading environment file: {}", path.display()), e))?;
    Ok(parse_environment(&contents))
}

pub fn parse_environment(contents: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let assignment = trimmed
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(trimmed);
        if let Some((key, raw_val)) = assignment.split_once('=') {
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                continue;
            }
            let val = raw_val
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string();
            vars.push((key.to_string(), val));
        }
    }
    vars
}

/// Read `{conf_dir}/atlas-env.sh` when present. A missing file yields no variables.
pub fn load_conf_environment(conf_dir: &Path) -> Result<Vec<(String, String)>> {
    let path = conf_dir.join(ENV_FILE_NAME);
    if !path.is_file() {
        debug!("no environment file at {}", path.display());
        return Ok(Vec::new());
    }
    let vars = parse_environment_file(&path)?;
    debug!("loaded {} variable(s) from {}", vars.len(), path.display());
    Ok(vars)
}
