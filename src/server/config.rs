use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,

    #[serde(default = "ServerConfig::default_ssl")]
    pub ssl: bool,

    #[serde(default = "ServerConfig::default_cert_path")]
    pub cert_path: String,

    #[serde(default = "ServerConfig::default_key_path")]
    pub key_path: String,

    #[serde(default = "ServerConfig::default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    #[serde(default = "ServerConfig::default_workers")]
    pub workers: u64,

    #[serde(default = "ServerConfig::default_payload_limit_kib")]
    pub payload_limit_kib: usize,

    /// Upper bound for one authorization, store call included. 0 disables it.
    #[serde(default = "ServerConfig::default_deadline_ms")]
    pub deadline_ms: u64,
}

impl CommonConfig for ServerConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
            ssl: Self::default_ssl(),
            cert_path: Self::default_cert_path(),
            key_path: Self::default_key_path(),
            keep_alive_secs: Self::default_keep_alive_secs(),
            workers: Self::default_workers(),
            payload_limit_kib: Self::default_payload_limit_kib(),
            deadline_ms: Self::default_deadline_ms(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.bind = expandenv("bind", &self.bind)?;
        if self.bind.is_empty() {
            bail!("bind cannot be empty");
        }

        if self.ssl {
            self.cert_path = expandenv("cert_path", &self.cert_path)?;
            if self.cert_path.is_empty() {
                bail!("cert_path cannot be empty when ssl is enabled");
            }

            self.key_path = expandenv("key_path", &self.key_path)?;
            if self.key_path.is_empty() {
                bail!("key_path cannot be empty when ssl is enabled");
            }
        }

        if self.payload_limit_kib < Self::MIN_PAYLOAD_LIMIT_KIB {
            bail!(
                "payload_limit_kib must be greater than or equal to {}",
                Self::MIN_PAYLOAD_LIMIT_KIB
            );
        }
        if self.payload_limit_kib > Self::MAX_PAYLOAD_LIMIT_KIB {
            bail!(
                "payload_limit_kib must be less than or equal to {}",
                Self::MAX_PAYLOAD_LIMIT_KIB
            );
        }

        Ok(())
    }
}

impl ServerConfig {
    const MAX_PAYLOAD_LIMIT_KIB: usize = 1024;
    const MIN_PAYLOAD_LIMIT_KIB: usize = 1;

    pub fn default_bind() -> String {
        String::from("127.0.0.1:9000")
    }

    pub fn default_ssl() -> bool {
        false
    }

    pub fn default_cert_path() -> String {
        String::new()
    }

    pub fn default_key_path() -> String {
        String::new()
    }

    pub fn default_keep_alive_secs() -> u64 {
        0
    }

    pub fn default_workers() -> u64 {
        0
    }

    pub fn default_payload_limit_kib() -> usize {
        64
    }

    pub fn default_deadline_ms() -> u64 {
        3000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete() {
        let mut cfg = <ServerConfig as CommonConfig>::default();
        cfg.complete().unwrap();

        let mut cfg = <ServerConfig as CommonConfig>::default();
        cfg.bind = String::new();
        assert!(cfg.complete().is_err());

        let mut cfg = <ServerConfig as CommonConfig>::default();
        cfg.ssl = true;
        assert!(cfg.complete().is_err());
        cfg.cert_path = String::from("/etc/authorizer/server.crt");
        assert!(cfg.complete().is_err());
        cfg.key_path = String::from("/etc/authorizer/server.key");
        cfg.complete().unwrap();

        let mut cfg = <ServerConfig as CommonConfig>::default();
        cfg.payload_limit_kib = 0;
        assert!(cfg.complete().is_err());
        cfg.payload_limit_kib = 4096;
        assert!(cfg.complete().is_err());
    }
}
