use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslMethod};

use crate::authz::factory::AuthorizerFactory;
use crate::config::AuthorizerConfig;

use super::config::ServerConfig;
use super::handlers::authorize::AuthorizeHandler;
use super::handlers::healthz::HealthzHandler;
use super::restful::{RestfulContext, RestfulServer};

pub struct ServerFactory {
    cfg: AuthorizerConfig,
}

impl ServerFactory {
    pub fn new(cfg: AuthorizerConfig) -> Self {
        Self { cfg }
    }

    pub async fn build_server(&self) -> Result<RestfulServer> {
        let server_cfg = &self.cfg.server;
        let ssl = Self::build_ssl(server_cfg)?;
        let ctx = self.build_context().await?;

        let mut srv = RestfulServer::new(
            server_cfg.bind.clone(),
            ssl,
            ctx,
            server_cfg.payload_limit_kib,
        );
        if server_cfg.keep_alive_secs > 0 {
            srv.set_keep_alive_secs(server_cfg.keep_alive_secs);
        }
        if server_cfg.workers > 0 {
            srv.set_workers(server_cfg.workers);
        }

        Ok(srv)
    }

    fn build_ssl(cfg: &ServerConfig) -> Result<Option<SslAcceptorBuilder>> {
        if !cfg.ssl {
            return Ok(None);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&cfg.key_path, openssl::ssl::SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&cfg.cert_path)
            .context("load ssl cert file")?;

        Ok(Some(builder))
    }

    async fn build_context(&self) -> Result<Arc<RestfulContext>> {
        let authorizer = AuthorizerFactory::new()
            .build_authorizer(&self.cfg)
            .await
            .context("init authorizer")?;

        let deadline = match self.cfg.server.deadline_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let authorize_handler = AuthorizeHandler::new(authorizer, deadline);
        let healthz_handler =
            HealthzHandler::new(authorize_handler.authorizer().namespace().is_some());

        Ok(Arc::new(RestfulContext {
            authorize_handler,
            healthz_handler,
        }))
    }
}
