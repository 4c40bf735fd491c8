// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Detection of a started server by connecting to its HTTP(S) port.

use crate::errors::{Error, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::{Duration, Instant};

pub const APPLICATION_PROPERTIES: &str = "atlas-application.properties";
pub const DEFAULT_BIND_ADDRESS: &str = "localhost";
pub const DEFAULT_HTTP_PORT: u16 = 21000;
pub const DEFAULT_HTTPS_PORT: u16 = 21443;

const BIND_ADDRESS_KEY: &str = "atlas.server.bind.address";
const ENABLE_TLS_KEY: &str = "atlas.enableTLS";
const HTTP_PORT_KEY: &str = "atlas.server.http.port";
const HTTPS_PORT_KEY: &str = "atlas.server.https.port";

/// Host and port the server listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_HTTP_PORT,
            tls: false,
        }
    }
}

impl ServerAddress {
    /// Read `{conf_dir}/atlas-application.properties`. A missing file yields
    /// the defaults.
    pub fn from_conf_dir(conf_dir: &str) -> Result<Self> {
        let path = Path::new(conf_dir).join(APPLICATION_PROPERTIES);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Self::from_properties(&parse_properties(&contents))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using default server address", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(format!("reading {}", path.display()), e)),
        }
    }

    pub fn from_properties(props: &HashMap<String, String>) -> Self {
        let tls = props
            .get(ENABLE_TLS_KEY)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let port = |key: &str, default: u16| {
            props
                .get(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        Self {
            host: props
                .get(BIND_ADDRESS_KEY)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: if tls {
                port(HTTPS_PORT_KEY, DEFAULT_HTTPS_PORT)
            } else {
                port(HTTP_PORT_KEY, DEFAULT_HTTP_PORT)
            },
            tls,
        }
    }

    /// Whether something accepts TCP connections on this address.
    pub fn is_listening(&self, connect_timeout: Duration) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("cannot resolve {}:{}: {e}", self.host, self.port);
                return false;
            }
        };
        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, connect_timeout).is_ok())
    }
}

/// `key=value` / `key: value` lines; `#` and `!` start comments.
pub fn parse_properties(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let idx = line.find(['=', ':'])?;
            let (key, value) = line.split_at(idx);
            let value = value.get(1..).unwrap_or_default();
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Poll `address` every `interval` until it accepts connections or `timeout`
/// elapses. Returns whether the server came up.
pub fn wait_for_startup(address: &ServerAddress, timeout: Duration, interval: Duration) -> bool {
    let start = Instant::now();
    info!(
        "waiting for Atlas server at {}:{} (timeout={}s)",
        address.host,
        address.port,
        timeout.as_secs()
    );
    loop {
        if address.is_listening(interval) {
            info!("Atlas server is up after {:.1}s", start.elapsed().as_secs_f64());
            return true;
        }
        if start.elapsed() >= timeout {
            warn!(
                "Atlas server did not start listening on {}:{} within {}s",
                address.host,
                address.port,
                timeout.as_secs()
            );
            return false;
        }
        std::thread::sleep(interval);
    }
}
