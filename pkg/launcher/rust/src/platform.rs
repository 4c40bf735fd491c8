// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

/// Host conventions that leak into the launch command: separators,
/// executable suffix and the PID probe strategy.
///
/// Paths handed to the JVM are assembled as strings with the profile's
/// separator rather than through `Path`, so both profiles can be produced
/// and checked from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProfile {
    Posix,
    Windows,
}

impl PlatformProfile {
    /// Profile of the running host.
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformProfile::Windows
        } else {
            PlatformProfile::Posix
        }
    }

    pub fn path_separator(self) -> char {
        match self {
            PlatformProfile::Posix => '/',
            PlatformProfile::Windows => '\\',
        }
    }

    /// Separator between class path entries and between `PATH` entries.
    pub fn list_separator(self) -> char {
        match self {
            PlatformProfile::Posix => ':',
            PlatformProfile::Windows => ';',
        }
    }

    pub fn executable_suffix(self) -> &'static str {
        match self {
            PlatformProfile::Posix => "",
            PlatformProfile::Windows => ".exe",
        }
    }

    pub fn executable_name(self, binary: &str) -> String {
        format!("{binary}{}", self.executable_suffix())
    }

    /// Join path components with the profile's separator. Empty components
    /// are skipped.
    pub fn join<S: AsRef<str>>(self, parts: &[S]) -> String {
        let sep = self.path_separator().to_string();
        parts
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(&sep)
    }

    pub fn join_list<S: AsRef<str>>(self, entries: &[S]) -> String {
        let sep = self.list_separator().to_string();
        entries
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&sep)
    }

    /// Split a `PATH`-style value, dropping empty entries and surrounding quotes.
    pub fn split_list(self, value: &str) -> Vec<String> {
        value
            .split(self.list_separator())
            .map(|e| e.trim().trim_matches('"'))
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect()
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformProfile::Posix => write!(f, "posix"),
            PlatformProfile::Windows => write!(f, "windows"),
        }
    }
}
