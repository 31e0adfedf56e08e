use anyhow::Result;
use async_trait::async_trait;

use super::memory::MemoryStore;
use super::ssm::SsmStore;
use super::{Entry, SecretStore};

pub enum UnionStore {
    Ssm(SsmStore),
    Memory(MemoryStore),
}

#[async_trait]
impl SecretStore for UnionStore {
    async fn get_entries(&self, path: &str) -> Result<Vec<Entry>> {
        match self {
            Self::Ssm(store) => store.get_entries(path).await,
            Self::Memory(store) => store.get_entries(path).await,
        }
    }
}
