use anyhow::{Context, Result};
use log::info;

use crate::config::AuthorizerConfig;
use crate::store::factory::StoreFactory;
use crate::store::union::UnionStore;

use super::policy::ResourceScope;
use super::Authorizer;

pub struct AuthorizerFactory;

impl AuthorizerFactory {
    pub fn new() -> Self {
        Self
    }

    pub async fn build_authorizer(&self, cfg: &AuthorizerConfig) -> Result<Authorizer<UnionStore>> {
        let store = StoreFactory::new()
            .build_store(&cfg.store)
            .await
            .context("init secret store")?;

        let scope = if cfg.wildcard {
            info!("Wildcard mode enabled, admitted users may invoke every method of the stage");
            ResourceScope::Wildcard
        } else {
            ResourceScope::Whitelist
        };

        Ok(Authorizer::new(store, cfg.namespace(), scope))
    }
}
