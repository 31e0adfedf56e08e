use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::response::{CommonResponse, ResourceResponse};

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const INTEGRATION_ERROR: &str = "Invalid resource identifier from gateway";

/// A wrapper struct for HTTP responses that provides convenient methods
/// for creating common response types
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    pub fn bad_request(message: impl AsRef<str>) -> Self {
        let message = format!("Bad request: {}", message.as_ref());
        Self::err_response(StatusCode::BAD_REQUEST, message)
    }

    /// The one rejection every denied request gets, whatever the cause.
    pub fn unauthorized() -> Self {
        Self::err_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED.to_string())
    }

    pub fn error(message: &str) -> Self {
        let message = format!("Server error: {message}");
        Self::err_response(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn json<T: Serialize + DeserializeOwned>(data: T) -> Self {
        let resp = ResourceResponse::<T> {
            code: StatusCode::OK.into(),
            message: None,
            data: Some(data),
        };
        Self {
            http_response: HttpResponse::Ok().json(resp),
        }
    }

    /// Plain JSON body without the response envelope, as the gateway expects.
    pub fn raw_json<T: Serialize>(data: T) -> Self {
        Self {
            http_response: HttpResponse::Ok().json(data),
        }
    }

    fn err_response(status: StatusCode, message: String) -> Self {
        let resp = CommonResponse {
            code: status.into(),
            message: Some(message),
        };
        Self {
            http_response: HttpResponseBuilder::new(status).json(resp),
        }
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
