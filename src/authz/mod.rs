pub mod credentials;
pub mod factory;
pub mod policy;
pub mod record;
pub mod resource;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::store::{self, SecretStore};
use crate::types::event::{AuthorizerEvent, AuthorizerResponse};

use self::policy::{PolicyBuilder, PolicyDocument, ResourceScope};
use self::resource::{MalformedResource, ResourceContext};

/// Why a request was rejected. Only for local diagnostics: callers always see
/// the same opaque rejection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    #[error("missing or unreadable authorization header")]
    MissingHeader,

    #[error("namespace is not configured")]
    Misconfigured,

    #[error("no complete record for user")]
    NoSuchUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no actions whitelisted")]
    NoWhitelist,

    #[error("no api key")]
    NoApiKey,
}

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("denied: {0}")]
    Denied(#[from] Denial),

    #[error(transparent)]
    MalformedResource(#[from] MalformedResource),
}

/// What an admitted caller gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub principal_id: String,
    pub api_key: String,
    pub policy: PolicyDocument,
}

impl From<Grant> for AuthorizerResponse {
    fn from(grant: Grant) -> Self {
        Self {
            principal_id: grant.principal_id,
            usage_identifier_key: grant.api_key,
            policy_document: grant.policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResult {
    Admit(Grant),
    Reject,
}

/// Runs one invocation: credentials, record lookup, password check, then the
/// policy for the current call. Holds no per-request state.
pub struct Authorizer<S: SecretStore> {
    store: S,
    namespace: Option<String>,
    builder: PolicyBuilder,
}

impl<S: SecretStore> Authorizer<S> {
    pub fn new(store: S, namespace: Option<String>, scope: ResourceScope) -> Self {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        if namespace.is_none() {
            warn!("Namespace is not configured, every request will be rejected");
        }
        Self {
            store,
            namespace,
            builder: PolicyBuilder::new(scope),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decides on the event, collapsing every denial into
    /// [`AuthorizationResult::Reject`]. Only a malformed resource identifier
    /// escapes as an error, since that is a defect in the host.
    pub async fn authorize(
        &self,
        event: &AuthorizerEvent,
    ) -> Result<AuthorizationResult, MalformedResource> {
        match self.evaluate(event).await {
            Ok(grant) => {
                info!(
                    "Admit '{}' with {} resource(s)",
                    grant.principal_id,
                    grant
                        .policy
                        .statements
                        .iter()
                        .map(|s| s.resources.len())
                        .sum::<usize>()
                );
                Ok(AuthorizationResult::Admit(grant))
            }
            Err(AuthzError::Denied(denial)) => {
                info!("Reject request: {denial}");
                Ok(AuthorizationResult::Reject)
            }
            Err(AuthzError::MalformedResource(err)) => {
                error!("Gateway integration error: {err}");
                Err(err)
            }
        }
    }

    /// Same pipeline as [`Authorizer::authorize`], keeping the internal cause.
    pub async fn evaluate(&self, event: &AuthorizerEvent) -> Result<Grant, AuthzError> {
        let creds = credentials::extract(event.headers.as_ref())?;
        debug!("Authorizing user '{}'", creds.username);

        let record =
            store::fetch_record(&self.store, self.namespace(), &creds.username).await?;

        if creds.password != record.password {
            return Err(Denial::InvalidCredentials.into());
        }

        if record.whitelist.is_empty() {
            return Err(Denial::NoWhitelist.into());
        }
        if record.api_key.is_empty() {
            return Err(Denial::NoApiKey.into());
        }

        let ctx = ResourceContext::parse(&event.resource_identifier)?;
        let policy = self.builder.build(&record.whitelist, &ctx);

        Ok(Grant {
            principal_id: record.username,
            api_key: record.api_key,
            policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use anyhow::Result;
    use async_trait::async_trait;
    use base64::prelude::BASE64_STANDARD;
    use base64::Engine;

    use crate::store::memory::MemoryStore;
    use crate::store::Entry;

    use super::*;

    const ARN: &str = "arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod/GET/hello/world";

    fn store() -> MemoryStore {
        MemoryStore::from_pairs([
            ("/api-users/alice/password", "secret"),
            ("/api-users/alice/whitelist", r#"["GET/hello/world","POST/orders"]"#),
            ("/api-users/alice/apiKey", "k1"),
            ("/api-users/carol/password", "pw"),
            ("/api-users/carol/whitelist", "[]"),
            ("/api-users/carol/apiKey", "k3"),
        ])
    }

    fn authorizer() -> Authorizer<MemoryStore> {
        Authorizer::new(
            store(),
            Some(String::from("api-users")),
            ResourceScope::Whitelist,
        )
    }

    fn event(user: &str, password: &str) -> AuthorizerEvent {
        let token = BASE64_STANDARD.encode(format!("{user}:{password}"));
        let mut headers = HashMap::new();
        headers.insert(String::from("Authorization"), format!("Basic {token}"));
        AuthorizerEvent {
            headers: Some(headers),
            resource_identifier: String::from(ARN),
        }
    }

    #[tokio::test]
    async fn test_admit() {
        let authz = authorizer();
        let result = authz.authorize(&event("alice", "secret")).await.unwrap();
        let grant = match result {
            AuthorizationResult::Admit(grant) => grant,
            AuthorizationResult::Reject => panic!("expect admit"),
        };
        assert_eq!(grant.principal_id, "alice");
        assert_eq!(grant.api_key, "k1");
        assert_eq!(grant.policy.statements.len(), 1);
        assert_eq!(
            grant.policy.statements[0].resources,
            vec![
                "arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod/GET/hello/world",
                "arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod/POST/orders",
            ]
        );
    }

    #[tokio::test]
    async fn test_denials() {
        let authz = authorizer();

        let cases = [
            (event("alice", "wrong"), Denial::InvalidCredentials),
            (event("alice", "Secret"), Denial::InvalidCredentials),
            (event("bob", "secret"), Denial::NoSuchUser),
            (event("carol", "pw"), Denial::NoWhitelist),
            (AuthorizerEvent::default(), Denial::MissingHeader),
        ];
        for (event, expect) in cases {
            match authz.evaluate(&event).await {
                Err(AuthzError::Denied(denial)) => assert_eq!(denial, expect),
                other => panic!("expect {expect:?}, got {other:?}"),
            }
            assert_eq!(
                authz.authorize(&event).await.unwrap(),
                AuthorizationResult::Reject
            );
        }
    }

    #[tokio::test]
    async fn test_missing_header_with_other_headers() {
        let authz = authorizer();
        let mut event = event("alice", "secret");
        let headers = event.headers.as_mut().unwrap();
        headers.remove("Authorization");
        headers.insert(String::from("X-Api-Key"), String::from("k1"));
        headers.insert(String::from("Cookie"), String::from("session=1"));

        assert_eq!(
            authz.authorize(&event).await.unwrap(),
            AuthorizationResult::Reject
        );
    }

    #[tokio::test]
    async fn test_misconfigured() {
        for namespace in [None, Some(String::new())] {
            let authz = Authorizer::new(store(), namespace, ResourceScope::Whitelist);
            assert_eq!(authz.namespace(), None);

            for (user, password) in [("alice", "secret"), ("alice", "wrong"), ("bob", "")] {
                match authz.evaluate(&event(user, password)).await {
                    Err(AuthzError::Denied(Denial::Misconfigured)) => {}
                    other => panic!("expect misconfigured, got {other:?}"),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_empty_store_result() {
        struct RawStore;

        #[async_trait]
        impl SecretStore for RawStore {
            async fn get_entries(&self, _path: &str) -> Result<Vec<Entry>> {
                Ok(vec![])
            }
        }

        // A record missing the key entirely never gets past the store.
        let authz = Authorizer::new(RawStore, Some(String::from("ns")), ResourceScope::Whitelist);
        match authz.evaluate(&event("alice", "secret")).await {
            Err(AuthzError::Denied(Denial::NoSuchUser)) => {}
            other => panic!("expect no such user, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_resource() {
        let authz = authorizer();
        let mut malformed = event("alice", "secret");
        malformed.resource_identifier = String::from("arn:aws:execute-api:us-east-1");

        let err = authz.authorize(&malformed).await.unwrap_err();
        assert_eq!(err.identifier, "arn:aws:execute-api:us-east-1");

        // Rejections are decided before the identifier is looked at.
        let mut bad_password = malformed.clone();
        bad_password.headers = event("alice", "wrong").headers;
        assert_eq!(
            authz.authorize(&bad_password).await.unwrap(),
            AuthorizationResult::Reject
        );
    }

    #[tokio::test]
    async fn test_wildcard() {
        let authz = Authorizer::new(
            store(),
            Some(String::from("api-users")),
            ResourceScope::Wildcard,
        );
        let grant = authz.evaluate(&event("alice", "secret")).await.unwrap();
        assert_eq!(
            grant.policy.statements[0].resources,
            vec!["arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod/*/*"]
        );

        // The whitelist is still required.
        match authz.evaluate(&event("carol", "pw")).await {
            Err(AuthzError::Denied(Denial::NoWhitelist)) => {}
            other => panic!("expect no whitelist, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_idempotent() {
        let authz = authorizer();
        let first: AuthorizerResponse = authz
            .evaluate(&event("alice", "secret"))
            .await
            .unwrap()
            .into();
        let second: AuthorizerResponse = authz
            .evaluate(&event("alice", "secret"))
            .await
            .unwrap()
            .into();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
