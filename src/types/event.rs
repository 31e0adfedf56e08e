use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::authz::policy::PolicyDocument;

/// The request-authorizer event sent by the gateway. Fields other than the
/// headers and the method identifier are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizerEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(rename = "methodArn", alias = "resourceIdentifier")]
    pub resource_identifier: String,
}

/// Returned to the gateway when the request is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,

    #[serde(rename = "usageIdentifierKey")]
    pub usage_identifier_key: String,

    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
}
