use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::Client;
use log::info;

use super::{Entry, SecretStore};

/// SSM Parameter Store backend. Reads every parameter under a path with
/// decryption enabled, following pagination.
#[derive(Debug, Clone)]
pub struct SsmStore {
    client: Client,
}

impl SsmStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (environment,
    /// profile, instance role), with optional region and endpoint overrides.
    pub async fn connect(region: Option<String>, endpoint_url: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            info!("Using SSM region '{region}'");
            loader = loader.region(Region::new(region));
        }
        if let Some(url) = endpoint_url {
            info!("Using SSM endpoint '{url}'");
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl SecretStore for SsmStore {
    async fn get_entries(&self, path: &str) -> Result<Vec<Entry>> {
        let mut pages = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(true)
            .with_decryption(true)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.with_context(|| format!("get parameters by path '{path}'"))?;
            for param in page.parameters() {
                let (Some(name), Some(value)) = (param.name(), param.value()) else {
                    continue;
                };
                entries.push(Entry {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(entries)
    }
}
