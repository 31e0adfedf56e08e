use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{Entry, SecretStore};

/// Secret store held in memory, optionally loaded from a TOML file:
///
/// ```toml
/// [parameters]
/// "/api-users/alice/password" = "secret"
/// "/api-users/alice/whitelist" = '["GET/hello"]'
/// "/api-users/alice/apiKey" = "k1"
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    parameters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ParametersFile {
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new(parameters: BTreeMap<String, String>) -> Self {
        Self { parameters }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let parameters = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { parameters }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read parameters file '{}'", path.display()))?;
        let file: ParametersFile = toml::from_str(&data)
            .with_context(|| format!("parse parameters file '{}' toml", path.display()))?;
        Ok(Self::new(file.parameters))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn get_entries(&self, path: &str) -> Result<Vec<Entry>> {
        let path = path.trim_end_matches('/');
        let prefix = format!("{path}/");
        let entries = self
            .parameters
            .iter()
            .filter(|(name, _)| name.as_str() == path || name.starts_with(&prefix))
            .map(|(name, value)| Entry {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_get_entries() {
        let store = MemoryStore::from_pairs([
            ("/ns/alice/password", "a"),
            ("/ns/alice/apiKey", "b"),
            ("/ns/alice/extra/deep", "c"),
            ("/ns/alicia/password", "d"),
            ("/ns/bob/password", "e"),
        ]);

        let entries = store.get_entries("/ns/alice").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["/ns/alice/apiKey", "/ns/alice/extra/deep", "/ns/alice/password"]
        );

        assert!(store.get_entries("/ns/carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[parameters]
"/api-users/alice/password" = "secret"
"/api-users/alice/whitelist" = '["GET/hello"]'
"/api-users/alice/apiKey" = "k1"
"#
        )
        .unwrap();

        let store = MemoryStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 3);

        let entries = store.get_entries("/api-users/alice").await.unwrap();
        assert!(entries.contains(&Entry {
            name: String::from("/api-users/alice/whitelist"),
            value: String::from(r#"["GET/hello"]"#),
        }));
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MemoryStore::load(dir.path().join("nope.toml")).is_err());
    }
}
