//! Shell configuration.
//!
//! Resolution order: built-in defaults, then an optional RON file, then the
//! `CLIPWISE_*` environment variables (a `.env` file is loaded first by
//! `main`), then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use clipwise_engine::{DownloadSettings, EngineConfig, SubmitSettings};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "clipwise.ron";
pub const ENV_ENDPOINT: &str = "CLIPWISE_ENDPOINT";
pub const ENV_DOWNLOAD_DIR: &str = "CLIPWISE_DOWNLOAD_DIR";

#[derive(Parser, Debug, Default)]
#[command(name = "clipwise", about = "Find the interesting clips in a video")]
pub struct Cli {
    /// RON config file. Defaults to ./clipwise.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Clip service endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Directory downloaded clips are saved to.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
    /// Log at debug level.
    #[arg(long)]
    pub verbose: bool,
    /// Video link to submit on startup.
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub endpoint: String,
    pub download_dir: PathBuf,
    pub submit_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub log: LogDestination,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let submit = SubmitSettings::default();
        let download = DownloadSettings::default();
        Self {
            endpoint: submit.endpoint,
            download_dir: download.download_dir,
            submit_timeout_secs: submit.http.request_timeout.as_secs(),
            download_timeout_secs: download.http.request_timeout.as_secs(),
            log: LogDestination::default(),
        }
    }
}

impl ShellConfig {
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(env);
        config.apply_cli(cli);
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = env(ENV_ENDPOINT).filter(|value| !value.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(dir) = env(ENV_DOWNLOAD_DIR).filter(|value| !value.trim().is_empty()) {
            self.download_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.submit_timeout_secs == 0 || self.download_timeout_secs == 0 {
            bail!("timeouts must be at least one second");
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            bail!("endpoint must be an http(s) URL, got {:?}", self.endpoint);
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut submit = SubmitSettings::new(self.endpoint.clone());
        submit.http.request_timeout = Duration::from_secs(self.submit_timeout_secs);

        let mut download = DownloadSettings {
            download_dir: self.download_dir.clone(),
            ..DownloadSettings::default()
        };
        download.http.request_timeout = Duration::from_secs(self.download_timeout_secs);

        EngineConfig { submit, download }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_at_local_service() {
        let config = ShellConfig::default();
        assert_eq!(config.endpoint, "http://localhost:5000/clip");
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.submit_timeout_secs, 300);
    }

    #[test]
    fn file_then_env_then_flags() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clipwise.ron");
        fs::write(
            &path,
            r#"(endpoint: "http://file.example/clip", download_dir: "from_file", submit_timeout_secs: 60)"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            download_dir: Some(PathBuf::from("from_flag")),
            ..Cli::default()
        };
        let env = |key: &str| match key {
            ENV_ENDPOINT => Some("https://env.example/clip".to_string()),
            ENV_DOWNLOAD_DIR => Some("from_env".to_string()),
            _ => None,
        };

        let config = ShellConfig::resolve(&cli, env).unwrap();
        assert_eq!(config.endpoint, "https://env.example/clip");
        assert_eq!(config.download_dir, PathBuf::from("from_flag"));
        assert_eq!(config.submit_timeout_secs, 60);
        assert_eq!(config.download_timeout_secs, 120);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ShellConfig::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.ron")),
            ..Cli::default()
        };
        assert!(ShellConfig::resolve(&cli, no_env).is_err());
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.ron");
        fs::write(&path, "()").unwrap();
        let cli = Cli {
            endpoint: Some("localhost:5000".to_string()),
            config: Some(path),
            ..Cli::default()
        };
        assert!(ShellConfig::resolve(&cli, no_env).is_err());
    }

    #[test]
    fn engine_config_carries_timeouts() {
        let config = ShellConfig {
            submit_timeout_secs: 42,
            ..ShellConfig::default()
        };
        let engine = config.engine_config();
        assert_eq!(engine.submit.http.request_timeout, Duration::from_secs(42));
        assert_eq!(engine.submit.endpoint, config.endpoint);
        assert_eq!(engine.download.download_dir, config.download_dir);
    }
}
