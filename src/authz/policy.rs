use serde::{Deserialize, Serialize};

use super::record::Operation;
use super::resource::ResourceContext;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Effect")]
    pub effect: Effect,

    #[serde(rename = "Action")]
    pub action: String,

    #[serde(rename = "Resource")]
    pub resources: Vec<String>,
}

/// The policy handed back to the gateway. Field names and literals follow the
/// gateway's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,

    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

/// How whitelisted operations turn into resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceScope {
    /// One resource per whitelisted operation.
    #[default]
    Whitelist,
    /// A single `{stage}/*/*` resource.
    Wildcard,
}

pub struct PolicyBuilder {
    scope: ResourceScope,
}

impl PolicyBuilder {
    pub fn new(scope: ResourceScope) -> Self {
        Self { scope }
    }

    /// Builds one Allow statement covering the whitelist, in whitelist order.
    /// The output only depends on the inputs.
    pub fn build(&self, whitelist: &[Operation], ctx: &ResourceContext) -> PolicyDocument {
        let base = ctx.stage_arn();
        let resources = match self.scope {
            ResourceScope::Whitelist => whitelist
                .iter()
                .map(|op| format!("{base}/{op}"))
                .collect(),
            ResourceScope::Wildcard => vec![format!("{base}/*/*")],
        };

        PolicyDocument {
            version: String::from(POLICY_VERSION),
            statements: vec![Statement {
                effect: Effect::Allow,
                action: String::from(INVOKE_ACTION),
                resources,
            }],
        }
    }
}
