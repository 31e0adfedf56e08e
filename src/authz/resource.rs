use thiserror::Error;

/// The gateway handed us an identifier we cannot take apart. This is an
/// integration defect on the host side, not an authorization failure.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed resource identifier '{identifier}': {reason}")]
pub struct MalformedResource {
    pub identifier: String,
    pub reason: &'static str,
}

/// Where the current call is going: account, region, API and stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContext {
    pub partition: String,
    pub account_id: String,
    pub region: String,
    pub gateway_id: String,
    pub stage: String,
}

impl ResourceContext {
    /// Parses `arn:partition:service:region:account:apiId/stage/method/path`.
    pub fn parse(identifier: &str) -> Result<Self, MalformedResource> {
        let malformed = |reason: &'static str| MalformedResource {
            identifier: identifier.to_string(),
            reason,
        };

        // The trailing resource path may itself contain ':'.
        let fields: Vec<&str> = identifier.splitn(6, ':').collect();
        if fields.len() != 6 {
            return Err(malformed("expect 6 colon separated fields"));
        }

        let partition = fields[1];
        let region = fields[3];
        let account_id = fields[4];

        let mut api = fields[5].split('/');
        let gateway_id = api.next().unwrap_or_default();
        let stage = api.next().unwrap_or_default();

        if partition.is_empty() {
            return Err(malformed("empty partition"));
        }
        if region.is_empty() {
            return Err(malformed("empty region"));
        }
        if account_id.is_empty() {
            return Err(malformed("empty account id"));
        }
        if gateway_id.is_empty() {
            return Err(malformed("empty api id"));
        }
        if stage.is_empty() {
            return Err(malformed("missing stage"));
        }

        Ok(Self {
            partition: partition.to_string(),
            account_id: account_id.to_string(),
            region: region.to_string(),
            gateway_id: gateway_id.to_string(),
            stage: stage.to_string(),
        })
    }

    /// `arn:{partition}:execute-api:{region}:{account}:{api}/{stage}`, the
    /// common prefix of every resource granted for this call.
    pub fn stage_arn(&self) -> String {
        format!(
            "arn:{}:execute-api:{}:{}:{}/{}",
            self.partition, self.region, self.account_id, self.gateway_id, self.stage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let ctx = ResourceContext::parse(
            "arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod/GET/hello/world",
        )
        .unwrap();
        assert_eq!(
            ctx,
            ResourceContext {
                partition: String::from("aws"),
                account_id: String::from("123456789012"),
                region: String::from("us-east-1"),
                gateway_id: String::from("abcde12345"),
                stage: String::from("prod"),
            }
        );
        assert_eq!(
            ctx.stage_arn(),
            "arn:aws:execute-api:us-east-1:123456789012:abcde12345/prod"
        );

        // Only the api id and stage are required after the last colon.
        let ctx =
            ResourceContext::parse("arn:aws:execute-api:eu-west-1:111122223333:api1/dev").unwrap();
        assert_eq!(ctx.stage, "dev");

        let ctx = ResourceContext::parse(
            "arn:aws:execute-api:eu-west-1:111122223333:api1/dev/GET/time/12:30",
        )
        .unwrap();
        assert_eq!(ctx.gateway_id, "api1");
        assert_eq!(ctx.stage, "dev");
    }

    #[test]
    fn test_stage_arn_keeps_partition() {
        let cases = [
            (
                "arn:aws-cn:execute-api:cn-north-1:123456789012:abcde12345/prod/GET/hello",
                "arn:aws-cn:execute-api:cn-north-1:123456789012:abcde12345/prod",
            ),
            (
                "arn:aws-us-gov:execute-api:us-gov-west-1:123456789012:abcde12345/prod/GET/",
                "arn:aws-us-gov:execute-api:us-gov-west-1:123456789012:abcde12345/prod",
            ),
        ];
        for (identifier, expect) in cases {
            let ctx = ResourceContext::parse(identifier).unwrap();
            assert_eq!(ctx.stage_arn(), expect);
        }
    }

    #[test]
    fn test_parse_malformed() {
        let cases = [
            "",
            "not-an-arn",
            "arn:aws:execute-api:us-east-1:123456789012",
            "arn:aws:execute-api:us-east-1:123456789012:abcde12345",
            "arn:aws:execute-api:us-east-1:123456789012:abcde12345/",
            "arn:aws:execute-api:us-east-1:123456789012:/prod/GET/",
            "arn:aws:execute-api::123456789012:abcde12345/prod/GET/",
            "arn:aws:execute-api:us-east-1::abcde12345/prod/GET/",
            "arn::execute-api:us-east-1:123456789012:abcde12345/prod/GET/",
        ];
        for case in cases {
            let err = ResourceContext::parse(case).unwrap_err();
            assert_eq!(err.identifier, case);
        }
    }
}
