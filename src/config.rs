//! Server configuration
//!
//! Values come from environment variables by default, or from a YAML file
//! when `CONFIG` points at one. Every field has a default.

use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
const DEFAULT_DOCUMENT_ROOT: &str = "www";
const DEFAULT_SERVER_NAME: &str = "Jon's very own server";
const DEFAULT_TEMPLATE_SERVER_NAME: &str = "Ben Longwell's Webserver!";
const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub site: SiteConfig,
}

/// Per-connection settings handed to every [`Connection`](crate::http::connection::Connection).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory requested paths are resolved against
    pub document_root: PathBuf,

    /// Value of the `Server` response header
    pub server_name: String,

    /// Replacement for the `<cs371server>` template token
    pub template_server_name: String,

    /// Deadline for each socket stage of a connection
    pub io_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN.to_string(),
            site: SiteConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from(DEFAULT_DOCUMENT_ROOT),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            template_server_name: DEFAULT_TEMPLATE_SERVER_NAME.to_string(),
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
        }
    }
}

impl SiteConfig {
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Recognized keys: `LISTEN`, `DOC_ROOT`, `SERVER_NAME`,
    /// `TEMPLATE_SERVER_NAME`, `IO_TIMEOUT_SECS`. Missing keys, and an
    /// unparsable timeout, fall back to defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            cfg.site.document_root = PathBuf::from(root);
        }
        if let Some(name) = lookup("SERVER_NAME") {
            cfg.site.server_name = name;
        }
        if let Some(name) = lookup("TEMPLATE_SERVER_NAME") {
            cfg.site.template_server_name = name;
        }
        if let Some(secs) = lookup("IO_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => cfg.site.io_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %secs, "Ignoring invalid IO_TIMEOUT_SECS"),
            }
        }

        cfg
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration YAML")
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&contents)
    }
}
