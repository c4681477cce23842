// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Explicit kubeconfig file; when unset the client configuration is inferred
    pub kubeconfig: Option<PathBuf>,
    /// Kubeconfig context to use instead of the current one
    pub context: Option<String>,
    pub read_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let kubeconfig = env::var_os("KUBECONFIG")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let context = env::var("KUBE_CONTEXT").ok().filter(|v| !v.is_empty());

        let read_timeout = match env::var("KUBE_READ_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(value.parse().with_context(|| {
                format!("KUBE_READ_TIMEOUT_SECS is not a number of seconds: {}", value)
            })?)),
            Err(_) => None,
        };

        Ok(Config {
            kubeconfig,
            context,
            read_timeout,
        })
    }
}
