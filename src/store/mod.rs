pub mod config;
pub mod factory;
pub mod memory;
pub mod ssm;
pub mod union;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};

use crate::authz::record::AuthorizationRecord;
use crate::authz::Denial;

/// A decrypted key/value pair read from the secret store. `name` is the full
/// hierarchical path of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub value: String,
}

/// A path-addressable secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns every entry at or below `path`, decrypted.
    async fn get_entries(&self, path: &str) -> Result<Vec<Entry>>;
}

/// Loads the record for `username` from `/{namespace}/{username}`.
///
/// Store failures are never retried here; they reject the invocation the same
/// way an unknown user does.
pub async fn fetch_record<S>(
    store: &S,
    namespace: Option<&str>,
    username: &str,
) -> Result<AuthorizationRecord, Denial>
where
    S: SecretStore + ?Sized,
{
    let namespace = match namespace {
        Some(ns) if !ns.is_empty() => ns,
        _ => return Err(Denial::Misconfigured),
    };

    // Such a name would address another node of the hierarchy.
    if username.is_empty() || username.contains('/') {
        return Err(Denial::NoSuchUser);
    }

    let path = format!("/{namespace}/{username}");
    let entries = match store.get_entries(&path).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Read secret store path '{path}' failed: {e:#}");
            return Err(Denial::NoSuchUser);
        }
    };
    debug!("Secret store returned {} entries for '{path}'", entries.len());

    AuthorizationRecord::from_entries(&path, username, &entries)
}
