// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
// Panicking code
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod command;
pub mod config;
pub mod env;
mod errors;
pub mod launcher;
pub mod pid;
pub mod platform;
pub mod readiness;
pub mod resolve;
pub mod server;
pub mod spawn;
pub mod webapp;

#[cfg(test)]
pub(crate) mod test_utils;

pub use command::{ATLAS_MAIN_CLASS, CommandBuilder, LaunchSpec};
pub use config::{JvmSettings, Layout, Overrides, Settings};
pub use errors::{Error, Result};
pub use launcher::ProcessLauncher;
pub use pid::{PidLifecycle, PidRecord, ProcessTable, SystemProcessTable};
pub use platform::PlatformProfile;
pub use resolve::{ExecutableResolver, JavaEnv, SystemResolver};
pub use server::{Server, ServerStatus, StopOutcome};
pub use spawn::{ProcessSpawner, SpawnRequest, SystemSpawner};
pub use webapp::{WarExpander, WebAppResolver};
