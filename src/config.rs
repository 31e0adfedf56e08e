use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::logs::LogsConfig;
use crate::server::config::ServerConfig;
use crate::store::config::StoreConfig;

pub const ENV_CONFIG: &str = "AUTHORIZER_CONFIG";
pub const ENV_NAMESPACE: &str = "AUTHORIZER_NAMESPACE";
pub const ENV_LOG_LEVEL: &str = "AUTHORIZER_LOG_LEVEL";

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self) -> Result<()>;
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthorizerConfig {
    /// Root of the per-user records in the secret store. Empty means the
    /// deployment is misconfigured and every invocation is rejected.
    #[serde(default = "AuthorizerConfig::default_namespace")]
    pub namespace: String,

    /// Grant `{stage}/*/*` instead of one resource per whitelisted operation.
    #[serde(default = "AuthorizerConfig::default_wildcard")]
    pub wildcard: bool,

    #[serde(default = "StoreConfig::default")]
    pub store: StoreConfig,

    #[serde(default = "ServerConfig::default")]
    pub server: ServerConfig,

    #[serde(default = "LogsConfig::default")]
    pub logs: LogsConfig,
}

impl CommonConfig for AuthorizerConfig {
    fn default() -> Self {
        Self {
            namespace: Self::default_namespace(),
            wildcard: Self::default_wildcard(),
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            logs: LogsConfig::default(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        if let Some(namespace) = env_value(ENV_NAMESPACE)? {
            self.namespace = namespace;
        }
        self.namespace = expandenv("namespace", &self.namespace)?;
        self.namespace = self.namespace.trim_matches('/').to_string();

        if let Some(level) = env_value(ENV_LOG_LEVEL)? {
            self.logs.level = level;
        }

        self.store.complete().context("store")?;
        self.server.complete().context("server")?;
        self.logs.complete().context("logs")?;

        Ok(())
    }
}

impl AuthorizerConfig {
    pub fn default_namespace() -> String {
        String::new()
    }

    pub fn default_wildcard() -> bool {
        false
    }

    /// Loads the configuration from `path`, falling back to `$AUTHORIZER_CONFIG`.
    /// A missing file yields the defaults; environment overrides are applied
    /// in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(PathBuf::from(path)),
            None => env::var_os(ENV_CONFIG).map(PathBuf::from),
        };

        let mut cfg: Self = match path {
            Some(path) => load_file(&path, <Self as CommonConfig>::default)?,
            None => <Self as CommonConfig>::default(),
        };

        cfg.complete().context("validate config")?;
        Ok(cfg)
    }

    pub fn namespace(&self) -> Option<String> {
        if self.namespace.is_empty() {
            return None;
        }
        Some(self.namespace.clone())
    }
}

pub fn load_file<T, F>(path: &Path, default_func: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match fs::read_to_string(path) {
        Ok(s) => toml::from_str(&s)
            .with_context(|| format!("parse config file '{}' toml", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(
                "Config file '{}' not found, using defaults",
                path.display()
            );
            Ok(default_func())
        }
        Err(err) => Err(err).with_context(|| format!("read config file '{}'", path.display())),
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

fn env_value(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read env '{name}'")),
    }
}
