use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub enum StoreKind {
    /// AWS SSM Parameter Store.
    #[serde(rename = "ssm")]
    #[default]
    Ssm,

    /// A local TOML file, loaded into memory at startup.
    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "StoreKind::default")]
    pub kind: StoreKind,

    /// SSM region, empty to use the ambient AWS configuration.
    #[serde(default = "StoreConfig::default_region")]
    pub region: String,

    /// SSM endpoint override, mainly for local emulators.
    #[serde(default = "StoreConfig::default_endpoint_url")]
    pub endpoint_url: String,

    /// Parameters file, required when `kind` is `file`.
    #[serde(default = "StoreConfig::default_path")]
    pub path: String,
}

impl CommonConfig for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            region: Self::default_region(),
            endpoint_url: Self::default_endpoint_url(),
            path: Self::default_path(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        match self.kind {
            StoreKind::Ssm => {
                self.region = expandenv("region", &self.region)?;
                self.endpoint_url = expandenv("endpoint_url", &self.endpoint_url)?;
            }
            StoreKind::File => {
                self.path = expandenv("path", &self.path)?;
                if self.path.is_empty() {
                    bail!("path cannot be empty for file store");
                }
            }
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn default_region() -> String {
        String::new()
    }

    pub fn default_endpoint_url() -> String {
        String::new()
    }

    pub fn default_path() -> String {
        String::new()
    }
}
