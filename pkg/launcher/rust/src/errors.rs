// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not resolve web application: {context}")]
    Resolution { context: String },

    #[error("the {binary} binary could not be found in your path or JAVA_HOME")]
    EnvironmentResolution { binary: String },

    #[error("failed to start {program}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    LaunchExit { program: String, status: String },

    #[error("pid file {path}")]
    PidFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not probe process {pid}")]
    Probe {
        pid: String,
        #[source]
        source: io::Error,
    },

    #[error("Atlas server is already running under process {pid}")]
    AlreadyRunning { pid: u32 },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}
