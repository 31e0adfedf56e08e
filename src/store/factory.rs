use anyhow::{Context, Result};
use log::{info, warn};

use super::config::{StoreConfig, StoreKind};
use super::memory::MemoryStore;
use super::ssm::SsmStore;
use super::union::UnionStore;

pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn build_store(&self, cfg: &StoreConfig) -> Result<UnionStore> {
        match cfg.kind {
            StoreKind::Ssm => {
                let region = non_empty(&cfg.region);
                let endpoint_url = non_empty(&cfg.endpoint_url);
                let store = SsmStore::connect(region, endpoint_url).await;
                info!("Using SSM parameter store");
                Ok(UnionStore::Ssm(store))
            }
            StoreKind::File => {
                let store = MemoryStore::load(&cfg.path).context("load file store")?;
                warn!(
                    "Using file store '{}' with {} parameters, DO NOT USE IN PRODUCTION",
                    cfg.path,
                    store.len()
                );
                Ok(UnionStore::Memory(store))
            }
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::CommonConfig;

    use super::*;

    #[tokio::test]
    async fn test_build_file_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parameters]\n\"/ns/a/password\" = \"x\"").unwrap();

        let mut cfg = <StoreConfig as CommonConfig>::default();
        cfg.kind = StoreKind::File;
        cfg.path = file.path().display().to_string();

        let store = StoreFactory::new().build_store(&cfg).await.unwrap();
        match store {
            UnionStore::Memory(store) => assert_eq!(store.len(), 1),
            UnionStore::Ssm(_) => panic!("expect memory store"),
        }
    }

    #[tokio::test]
    async fn test_build_file_store_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = <StoreConfig as CommonConfig>::default();
        cfg.kind = StoreKind::File;
        cfg.path = dir.path().join("missing.toml").display().to_string();

        assert!(StoreFactory::new().build_store(&cfg).await.is_err());
    }
}
