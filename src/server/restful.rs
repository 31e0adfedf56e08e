use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::web::{self, Bytes, Data, PayloadConfig, ServiceConfig};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use log::{info, warn};
use openssl::ssl::SslAcceptorBuilder;
use sd_notify::NotifyState;

use crate::store::union::UnionStore;
use crate::store::SecretStore;
use crate::types::response::CommonResponse;

use super::handlers::authorize::AuthorizeHandler;
use super::handlers::healthz::HealthzHandler;

pub struct RestfulServer {
    ssl: Option<SslAcceptorBuilder>,
    ctx: Arc<RestfulContext>,

    keep_alive_secs: Option<u64>,
    workers: Option<u64>,

    bind: String,

    payload_limit: usize,
}

pub struct RestfulContext<S: SecretStore = UnionStore> {
    pub authorize_handler: AuthorizeHandler<S>,
    pub healthz_handler: HealthzHandler,
}

impl RestfulServer {
    pub const AUTHORIZE_PATH: &str = "/authorize";
    pub const HEALTHZ_PATH: &str = "/healthz";

    pub fn new(
        bind: String,
        ssl: Option<SslAcceptorBuilder>,
        ctx: Arc<RestfulContext>,
        payload_limit_kib: usize,
    ) -> Self {
        Self {
            ssl,
            ctx,
            keep_alive_secs: None,
            workers: None,
            bind,
            payload_limit: payload_limit_kib * 1024,
        }
    }

    pub fn set_keep_alive_secs(&mut self, keep_alive_secs: u64) {
        self.keep_alive_secs = Some(keep_alive_secs);
    }

    pub fn set_workers(&mut self, workers: u64) {
        self.workers = Some(workers);
    }

    /// Registers the routes; shared by the server and the tests.
    pub fn routes<S: SecretStore + 'static>(
        ctx: Arc<RestfulContext<S>>,
        payload_limit: usize,
    ) -> impl FnOnce(&mut ServiceConfig) {
        move |cfg: &mut ServiceConfig| {
            cfg.app_data(Data::new(ctx))
                .app_data(PayloadConfig::new(payload_limit))
                .service(
                    web::resource(Self::AUTHORIZE_PATH)
                        .route(web::post().to(Self::handle_authorize::<S>)),
                )
                .service(
                    web::resource(Self::HEALTHZ_PATH)
                        .route(web::get().to(Self::handle_healthz::<S>)),
                );
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let payload_limit = self.payload_limit;
        let mut srv = HttpServer::new(move || {
            App::new()
                .configure(Self::routes(ctx.clone(), payload_limit))
                .default_service(web::route().to(Self::default_handler))
        });

        if let Some(ssl) = self.ssl.take() {
            info!("Binding to https://{}", self.bind);
            srv = srv.bind_openssl(&self.bind, ssl).context("bind with ssl")?
        } else {
            warn!("Using HTTP (without SSL), keep the authorizer on a trusted network");
            info!("Binding to http://{}", self.bind);
            srv = srv.bind(&self.bind).context("bind without ssl")?
        };

        if let Some(keep_alive) = self.keep_alive_secs {
            srv = srv.keep_alive(Duration::from_secs(keep_alive));
        }
        if let Some(workers) = self.workers {
            srv = srv.workers(workers as usize);
        }

        sd_notify::notify(true, &[NotifyState::Ready]).context("notify systemd")?;
        info!("Starting authorizer server");
        srv.run().await.context("run server")?;

        info!("Server stopped by user");
        Ok(())
    }

    async fn handle_authorize<S: SecretStore + 'static>(
        body: Bytes,
        ctx: Data<Arc<RestfulContext<S>>>,
    ) -> HttpResponse {
        ctx.authorize_handler.handle(&body).await.into()
    }

    async fn handle_healthz<S: SecretStore + 'static>(
        req: HttpRequest,
        ctx: Data<Arc<RestfulContext<S>>>,
    ) -> HttpResponse {
        ctx.healthz_handler.handle(&req).into()
    }

    pub async fn default_handler(req: HttpRequest) -> HttpResponse {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        let message = format!("No route to {method} {path}");
        let ret = CommonResponse {
            code: StatusCode::NOT_FOUND.into(),
            message: Some(message),
        };
        HttpResponse::NotFound().json(ret)
    }
}
