use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::Entry;

use super::Denial;

pub const KEY_PASSWORD: &str = "password";
pub const KEY_WHITELIST: &str = "whitelist";
pub const KEY_API_KEY: &str = "apiKey";

/// One gateway operation a user may invoke, written as `METHOD/path`, e.g.
/// `GET/hello/world`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operation(String);

impl Operation {
    pub fn new(op: impl Into<String>) -> Self {
        Self(op.into())
    }

    /// Accepts `METHOD/path`, where `METHOD` is an ASCII word or `*`.
    pub fn parse(op: &str) -> Option<Self> {
        let (method, _) = op.split_once('/')?;
        let valid_method = method == "*"
            || (!method.is_empty() && method.bytes().all(|b| b.is_ascii_alphabetic()));
        if !valid_method {
            return None;
        }
        Some(Self(op.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a user's authorization data as held by the secret store.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationRecord {
    pub username: String,
    pub password: String,
    pub whitelist: Vec<Operation>,
    pub api_key: String,
}

impl fmt::Debug for AuthorizationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationRecord")
            .field("username", &self.username)
            .field("whitelist", &self.whitelist)
            .finish_non_exhaustive()
    }
}

impl AuthorizationRecord {
    /// Builds a record from the entries stored under `base`
    /// (`/{namespace}/{username}`). The three keys must be direct children of
    /// `base` with non-empty values; anything less is treated as an unknown
    /// user so the caller cannot tell which users are provisioned. So is a
    /// whitelist that cannot be read.
    pub fn from_entries(base: &str, username: &str, entries: &[Entry]) -> Result<Self, Denial> {
        let mut password = None;
        let mut whitelist = None;
        let mut api_key = None;

        for entry in entries {
            let key = match entry
                .name
                .strip_prefix(base)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                Some(key) => key,
                None => continue,
            };
            let slot = match key {
                KEY_PASSWORD => &mut password,
                KEY_WHITELIST => &mut whitelist,
                KEY_API_KEY => &mut api_key,
                _ => continue,
            };
            if !entry.value.is_empty() {
                *slot = Some(entry.value.clone());
            }
        }

        let (password, whitelist, api_key) = match (password, whitelist, api_key) {
            (Some(password), Some(whitelist), Some(api_key)) => (password, whitelist, api_key),
            _ => return Err(Denial::NoSuchUser),
        };

        Ok(Self {
            username: username.to_string(),
            password,
            whitelist: parse_whitelist(&whitelist).ok_or(Denial::NoSuchUser)?,
            api_key,
        })
    }
}

/// Reads a whitelist value: a JSON array of strings, or else a comma separated
/// list. Blank items are dropped, order is kept. Returns `None` for a broken
/// JSON array or an item that is not an operation.
pub fn parse_whitelist(value: &str) -> Option<Vec<Operation>> {
    let value = value.trim();
    let items: Vec<String> = if value.starts_with('[') {
        serde_json::from_str(value).ok()?
    } else {
        value.split(',').map(String::from).collect()
    };
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(Operation::parse)
        .collect()
}
