use std::collections::HashMap;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;

use super::Denial;

pub const HEADER_AUTHORIZATION: &str = "Authorization";

const BASIC_PREFIX: &str = "Basic ";

/// Username and password decoded from a Basic authorization header. Lives only
/// for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Extracts Basic credentials from the request headers.
///
/// The header name is matched case-insensitively, the `Basic ` prefix is
/// literal. An exact `Authorization` key wins; among other spellings the
/// smallest key is taken. The decoded payload is split on the first `:` only, so the
/// password may itself contain colons. No trimming or case folding is applied.
pub fn extract(headers: Option<&HashMap<String, String>>) -> Result<Credentials, Denial> {
    let headers = headers.ok_or(Denial::MissingHeader)?;
    let value = match headers.get(HEADER_AUTHORIZATION) {
        Some(value) => value.as_str(),
        None => headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(HEADER_AUTHORIZATION))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, value)| value.as_str())
            .ok_or(Denial::MissingHeader)?,
    };

    let encoded = value
        .strip_prefix(BASIC_PREFIX)
        .ok_or(Denial::MissingHeader)?;
    let decoded = BASE64_STANDARD
        .decode(encoded)
        .map_err(|_| Denial::MissingHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| Denial::MissingHeader)?;

    let (username, password) = decoded.split_once(':').ok_or(Denial::MissingHeader)?;
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
