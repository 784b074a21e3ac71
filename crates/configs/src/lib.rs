use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_DATA_PATH: &str = "storage/data.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4), static_dir: None }
    }
}

/// Where the puppy collection lives, and where the seed collection comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default)]
    pub seed_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_path: default_data_path(), seed_path: None }
    }
}

fn default_data_path() -> String { DEFAULT_DATA_PATH.to_string() }

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow!("{key}={v} is not a valid value")),
        Err(_) => Ok(None),
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config purely from environment variables, used when no config file exists.
    /// A variable that is set but does not parse is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_env("SERVER_PORT")?.unwrap_or(defaults.port),
            worker_threads: parse_env("TOKIO_WORKER_THREADS")?,
            static_dir: std::env::var("STATIC_DIR").ok(),
        };
        let storage = StorageConfig {
            data_path: std::env::var("PUPPY_DATA_PATH").unwrap_or_else(|_| default_data_path()),
            seed_path: std::env::var("PUPPY_SEED_PATH").ok(),
        };
        Ok(Self { server, storage })
    }

    /// Config file from `CONFIG_PATH` (or `config.toml`) if it exists, otherwise environment.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    /// Only a missing file falls back to the environment; an unreadable,
    /// malformed or invalid file is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => load_from_str(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env()?,
            Err(e) => return Err(anyhow!("cannot read config file {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.static_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.static_dir = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_path.trim().is_empty() {
            self.data_path = default_data_path();
        }
        if self.seed_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.seed_path = None;
        }
    }
}
