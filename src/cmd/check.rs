use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Args;

use crate::authz::factory::AuthorizerFactory;
use crate::authz::AuthorizationResult;
use crate::logs::LogTarget;
use crate::types::event::{AuthorizerEvent, AuthorizerResponse};

use super::{ConfigArgs, RunCommand};

/// Run one authorization for an event read from a JSON file and print the
/// policy. Fails with "Unauthorized" when the request is rejected.
#[derive(Args)]
pub struct CheckArgs {
    /// The event JSON file, `-` reads from stdin.
    #[arg(short, long, default_value = "-")]
    pub event: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait(?Send)]
impl RunCommand for CheckArgs {
    async fn run(&self) -> Result<()> {
        let cfg = self.config.load()?;
        cfg.logs.init(Self::LOG_TARGET)?;

        let event = self.read_event()?;
        let authorizer = AuthorizerFactory::new().build_authorizer(&cfg).await?;

        match authorizer.authorize(&event).await? {
            AuthorizationResult::Admit(grant) => {
                let resp = AuthorizerResponse::from(grant);
                println!("{}", serde_json::to_string_pretty(&resp)?);
                Ok(())
            }
            AuthorizationResult::Reject => bail!("Unauthorized"),
        }
    }
}

impl CheckArgs {
    /// The admit JSON owns stdout.
    const LOG_TARGET: LogTarget = LogTarget::Stderr;

    fn read_event(&self) -> Result<AuthorizerEvent> {
        let data = if self.event == "-" {
            let mut data = String::new();
            io::stdin()
                .read_to_string(&mut data)
                .context("read event from stdin")?;
            data
        } else {
            fs::read_to_string(&self.event)
                .with_context(|| format!("read event file '{}'", self.event))?
        };
        serde_json::from_str(&data).context("parse event json")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(event: String) -> CheckArgs {
        CheckArgs {
            event,
            config: ConfigArgs { config: None },
        }
    }

    #[test]
    fn test_read_event() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"methodArn": "arn:aws:execute-api:us-east-1:1:a/b/GET/", "headers": {{"Authorization": "Basic YTpi"}}}}"#
        )
        .unwrap();

        let event = args(file.path().display().to_string()).read_event().unwrap();
        assert_eq!(
            event.resource_identifier,
            "arn:aws:execute-api:us-east-1:1:a/b/GET/"
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();
        assert!(args(file.path().display().to_string()).read_event().is_err());
    }

    #[test]
    fn test_logs_keep_stdout_clean() {
        assert_eq!(CheckArgs::LOG_TARGET, LogTarget::Stderr);
    }
}
