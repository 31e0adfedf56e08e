use actix_web::HttpRequest;

use crate::server::response::Response;
use crate::types::response::HealthzResponse;

pub struct HealthzHandler {
    namespace_configured: bool,
}

impl HealthzHandler {
    pub fn new(namespace_configured: bool) -> Self {
        Self {
            namespace_configured,
        }
    }

    pub fn handle(&self, req: &HttpRequest) -> Response {
        let response = HealthzResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            client_ip: req.connection_info().peer_addr().map(|a| a.to_string()),
            namespace_configured: self.namespace_configured,
        };
        Response::json(response)
    }
}
