use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use log::info;

use crate::logs::LogTarget;
use crate::server::factory::ServerFactory;

use super::{ConfigArgs, RunCommand};

/// Start the HTTP authorizer. The gateway posts its request-authorizer event
/// to `/authorize` and gets a policy back, or 401.
#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait(?Send)]
impl RunCommand for ServeArgs {
    async fn run(&self) -> Result<()> {
        let cfg = self.config.load()?;
        cfg.logs.init(LogTarget::Stdout)?;

        info!(
            "Starting authorizer, namespace '{}', store {:?}",
            cfg.namespace, cfg.store.kind
        );
        let factory = ServerFactory::new(cfg);
        let srv = factory.build_server().await.context("build server")?;
        srv.run().await
    }
}
