use std::time::Duration;

use log::warn;
use tokio::time;

use crate::authz::{AuthorizationResult, Authorizer};
use crate::server::response::{self, Response};
use crate::store::union::UnionStore;
use crate::store::SecretStore;
use crate::types::event::{AuthorizerEvent, AuthorizerResponse};

pub struct AuthorizeHandler<S: SecretStore = UnionStore> {
    authorizer: Authorizer<S>,
    deadline: Option<Duration>,
}

impl<S: SecretStore> AuthorizeHandler<S> {
    pub fn new(authorizer: Authorizer<S>, deadline: Option<Duration>) -> Self {
        Self {
            authorizer,
            deadline,
        }
    }

    pub fn authorizer(&self) -> &Authorizer<S> {
        &self.authorizer
    }

    pub async fn handle(&self, body: &[u8]) -> Response {
        if body.is_empty() {
            return Response::bad_request("Event body is required");
        }
        let event: AuthorizerEvent = match serde_json::from_slice(body) {
            Ok(event) => event,
            Err(e) => return Response::bad_request(format!("Invalid event: {e}")),
        };

        let result = match self.deadline {
            Some(deadline) => match time::timeout(deadline, self.authorizer.authorize(&event)).await
            {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the future abandons the in-flight store call.
                    warn!(
                        "Authorization exceeded deadline of {}ms, rejecting",
                        deadline.as_millis()
                    );
                    return Response::unauthorized();
                }
            },
            None => self.authorizer.authorize(&event).await,
        };

        match result {
            Ok(AuthorizationResult::Admit(grant)) => {
                Response::raw_json(AuthorizerResponse::from(grant))
            }
            Ok(AuthorizationResult::Reject) => Response::unauthorized(),
            Err(_) => Response::error(response::INTEGRATION_ERROR),
        }
    }
}
