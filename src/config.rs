use anyhow::{Context, bail};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `DEVSERVE_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "devserve.yaml";

/// Server configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub document_root: PathBuf,
    /// Default document for `/` and for directories.
    pub index_file: String,
    pub enable_cors: bool,
    pub enable_spa_fallback: bool,
    /// Pages listed in the startup banner, relative to the root URL.
    pub example_pages: Vec<String>,
    /// How long in-flight connections get to finish after Ctrl+C.
    pub shutdown_grace_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3500,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            document_root: PathBuf::from("./public"),
            index_file: "index.html".to_string(),
            enable_cors: false,
            enable_spa_fallback: true,
            example_pages: [
                "login.html",
                "master-dashboard.html",
                "campaign-detail.html",
                "login-debug.html",
                "test-api.html",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            shutdown_grace_secs: 5,
        }
    }
}

impl Config {
    /// Loads the config file (if any) and applies environment overrides.
    ///
    /// An explicit `DEVSERVE_CONFIG` path must exist; the implicit
    /// `devserve.yaml` is optional.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os("DEVSERVE_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses YAML; missing keys keep their defaults.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides fields from `DEVSERVE_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("DEVSERVE_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("DEVSERVE_PORT is not a port number: {port:?}"))?;
        }
        if let Some(host) = lookup("DEVSERVE_HOST") {
            self.host = host
                .trim()
                .parse()
                .with_context(|| format!("DEVSERVE_HOST is not an IP address: {host:?}"))?;
        }
        if let Some(root) = lookup("DEVSERVE_ROOT") {
            self.document_root = PathBuf::from(root);
        }
        if let Some(cors) = lookup("DEVSERVE_CORS") {
            self.enable_cors = parse_flag("DEVSERVE_CORS", &cors)?;
        }
        if let Some(fallback) = lookup("DEVSERVE_SPA_FALLBACK") {
            self.enable_spa_fallback = parse_flag("DEVSERVE_SPA_FALLBACK", &fallback)?;
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Absolute document root.
    ///
    /// Canonicalized when the directory exists; otherwise joined onto the
    /// working directory so the banner still shows where files are expected.
    pub fn resolved_root(&self) -> anyhow::Result<PathBuf> {
        if let Ok(canonical) = self.document_root.canonicalize() {
            return Ok(canonical);
        }
        if self.document_root.is_absolute() {
            return Ok(self.document_root.clone());
        }
        let cwd = std::env::current_dir().context("failed to determine working directory")?;
        Ok(cwd.join(&self.document_root))
    }
}

fn parse_flag(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got {other:?}"),
    }
}
