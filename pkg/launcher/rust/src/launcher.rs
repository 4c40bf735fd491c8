// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::command::LaunchSpec;
use crate::errors::Result;
use crate::resolve::ExecutableResolver;
use crate::spawn::{ProcessSpawner, SpawnRequest};
use log::info;
use std::sync::Arc;

/// Runs the JDK tools: `java` for the server, `jar` for web application expansion.
#[derive(Clone)]
pub struct ProcessLauncher {
    resolver: Arc<dyn ExecutableResolver>,
    spawner: Arc<dyn ProcessSpawner>,
    env: Vec<(String, String)>,
}

impl ProcessLauncher {
    pub fn new(resolver: Arc<dyn ExecutableResolver>, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self {
            resolver,
            spawner,
            env: Vec::new(),
        }
    }

    /// Extra environment for every spawned process.
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Start the server described by `spec`. Returns the PID once the process
    /// is confirmed started, without waiting for it to finish.
    pub fn launch(&self, spec: &LaunchSpec) -> Result<u32> {
        self.java(
            &spec.entry_point_class,
            &spec.application_args,
            &spec.class_path,
            &spec.jvm_options,
            Some(&spec.log_directory),
        )
    }

    /// `java <jvm_options> -classpath <class_path> <class_name> <args>`.
    pub fn java(
        &self,
        class_name: &str,
        args: &[String],
        class_path: &str,
        jvm_options: &[String],
        log_dir: Option<&str>,
    ) -> Result<u32> {
        let java = self.resolver.resolve("java")?;

        let mut argv = jvm_options.to_vec();
        argv.extend([
            "-classpath".to_string(),
            class_path.to_string(),
            class_name.to_string(),
        ]);
        argv.extend(args.iter().cloned());

        let request = SpawnRequest {
            program: java,
            args: argv,
            working_dir: None,
            log_dir: log_dir.map(String::from),
            env: self.env.clone(),
        };
        let pid = self.spawner.spawn(&request)?;
        info!("started {class_name} (pid={pid})");
        Ok(pid)
    }

    /// Extract `archive` into `dest_dir` with `jar -xf`, waiting for completion.
    pub fn jar(&self, archive: &str, dest_dir: &str) -> Result<()> {
        let jar = self.resolver.resolve("jar")?;
        let request = SpawnRequest {
            program: jar,
            args: vec!["-xf".to_string(), archive.to_string()],
            working_dir: Some(dest_dir.to_string()),
            log_dir: None,
            env: self.env.clone(),
        };
        self.spawner.run(&request)
    }
}
